use crate::error::Result;
use crate::palette::Palette;
use crate::render::RenderStyle;
use crate::settings::Settings;

/// A terminal canvas is only a few hundred pixels across, so baubles are
/// drawn larger and branches thinner than on a full-size surface.
pub const TERMINAL_DECORATION_SCALE: f64 = 3.0;
pub const TERMINAL_LINE_SCALE: f64 = 0.35;

/// Values given on the command line; `None` falls back to the settings file
#[derive(Clone, Debug, Default)]
pub struct CliOptions {
    pub print: bool,
    pub time_step: f32,
    pub frames: u32,
    pub palette: Option<String>,
    pub seed: Option<u64>,
    pub growth_limit: Option<f64>,
    pub decoration_scale: Option<f64>,
    pub line_scale: Option<f64>,
}

/// Configuration for a tree animation run
#[derive(Clone, Debug)]
pub struct TreeConfig {
    pub print: bool,
    pub time_step: f32,
    pub frames: u32,
    pub seed: Option<u64>,
    pub palette: Palette,
    pub growth_limit: Option<f64>,
    pub style: RenderStyle,
}

impl TreeConfig {
    /// Merge CLI options over the settings file over built-in defaults.
    pub fn resolve(cli: CliOptions, settings: &Settings) -> Result<Self> {
        let palette = match &cli.palette {
            Some(list) => Palette::parse_list(list)?,
            None => settings.palette()?.unwrap_or_default(),
        };

        let defaults = RenderStyle::default();
        let style = RenderStyle {
            background: settings.style.background()?.unwrap_or(defaults.background),
            branch_colour: settings.style.branch_colour()?.unwrap_or(defaults.branch_colour),
            decoration_scale: cli
                .decoration_scale
                .or(settings.style.decoration_scale)
                .unwrap_or(TERMINAL_DECORATION_SCALE),
            line_scale: cli
                .line_scale
                .or(settings.style.line_scale)
                .unwrap_or(TERMINAL_LINE_SCALE),
        };

        Ok(Self {
            print: cli.print,
            time_step: cli.time_step,
            frames: cli.frames,
            seed: cli.seed.or(settings.seed),
            palette,
            growth_limit: cli.growth_limit.or(settings.growth_limit),
            style,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::Colour;

    #[test]
    fn cli_overrides_settings() {
        let settings = Settings::from_toml_str(
            r#"
            palette = ["00ff00"]
            seed = 1
            [style]
            line_scale = 0.5
            "#,
        )
        .unwrap();
        let cli = CliOptions {
            palette: Some("ff0000,0000ff".to_string()),
            seed: Some(9),
            ..CliOptions::default()
        };

        let config = TreeConfig::resolve(cli, &settings).unwrap();
        assert_eq!(config.seed, Some(9));
        assert_eq!(config.palette.colours(), &[Colour::rgb(255, 0, 0), Colour::rgb(0, 0, 255)]);
        assert_eq!(config.style.line_scale, 0.5);
        assert_eq!(config.style.decoration_scale, TERMINAL_DECORATION_SCALE);
    }

    #[test]
    fn defaults_without_settings() {
        let config = TreeConfig::resolve(CliOptions::default(), &Settings::default()).unwrap();
        assert_eq!(config.palette, Palette::default());
        assert_eq!(config.growth_limit, None);
        assert_eq!(config.style.branch_colour, crate::render::BRANCH_COLOUR);
    }

    #[test]
    fn bad_cli_palette_is_rejected() {
        let cli = CliOptions {
            palette: Some("nope".to_string()),
            ..CliOptions::default()
        };
        assert!(TreeConfig::resolve(cli, &Settings::default()).is_err());
    }
}
