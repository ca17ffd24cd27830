use crossterm::{
    cursor::{Hide, MoveTo, Show},
    event::{poll, read, Event, KeyCode, KeyModifiers},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{
        disable_raw_mode, enable_raw_mode, size, Clear, ClearType, EnterAlternateScreen,
        LeaveAlternateScreen,
    },
};
use std::io::{self, stdout, Write};
use std::time::Duration;
use treeglow::canvas::Canvas;
use treeglow::Colour;

/// Upper half block: foreground paints the top pixel, background the bottom
const HALF_BLOCK: char = '▀';

/// Terminal abstraction for rendering
pub struct Terminal {
    width: u16,
    height: u16,
    buffer: Vec<Vec<Cell>>,
    alternate_screen: bool,
}

/// A single cell in the terminal buffer
#[derive(Clone, PartialEq)]
pub struct Cell {
    pub ch: char,
    pub fg: Option<Color>,
    pub bg: Option<Color>,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            ch: ' ',
            fg: None,
            bg: None,
        }
    }
}

pub fn to_color(c: Colour) -> Color {
    Color::Rgb { r: c.r, g: c.g, b: c.b }
}

impl Terminal {
    /// Initialize the terminal for drawing
    pub fn new(alternate_screen: bool) -> io::Result<Self> {
        let (width, height) = size()?;

        if alternate_screen {
            enable_raw_mode()?;
            execute!(stdout(), EnterAlternateScreen, Hide)?;
        }

        Ok(Self {
            width,
            height,
            buffer: vec![vec![Cell::default(); width as usize]; height as usize],
            alternate_screen,
        })
    }

    /// Get terminal dimensions
    pub fn size(&self) -> (u16, u16) {
        (self.width, self.height)
    }

    /// Pixel size of a canvas that fills the terminal: two pixels per cell
    pub fn canvas_size(&self) -> (usize, usize) {
        (self.width as usize, self.height as usize * 2)
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        self.buffer = vec![vec![Cell::default(); width as usize]; height as usize];
    }

    /// Clear the actual terminal
    pub fn clear_screen(&self) -> io::Result<()> {
        execute!(stdout(), Clear(ClearType::All))?;
        Ok(())
    }

    /// Set a character at position with optional colors
    pub fn set(&mut self, x: i32, y: i32, ch: char, fg: Option<Color>, bg: Option<Color>) {
        if x >= 0 && x < self.width as i32 && y >= 0 && y < self.height as i32 {
            self.buffer[y as usize][x as usize] = Cell { ch, fg, bg };
        }
    }

    /// Set a string starting at position
    pub fn set_str(&mut self, x: i32, y: i32, s: &str, fg: Option<Color>, bg: Option<Color>) {
        for (i, ch) in s.chars().enumerate() {
            self.set(x + i as i32, y, ch, fg, bg);
        }
    }

    /// Copy a canvas into the buffer, two vertical pixels per cell
    pub fn blit(&mut self, canvas: &Canvas) {
        for y in 0..self.height as usize {
            for x in 0..self.width as usize {
                let top = canvas.pixel(x, y * 2).unwrap_or(Colour::BLACK);
                let bottom = canvas.pixel(x, y * 2 + 1).unwrap_or(Colour::BLACK);
                self.buffer[y][x] = Cell {
                    ch: HALF_BLOCK,
                    fg: Some(to_color(top)),
                    bg: Some(to_color(bottom)),
                };
            }
        }
    }

    /// Render the entire buffer to screen
    pub fn render(&self) -> io::Result<()> {
        let mut out = stdout();

        for (y, row) in self.buffer.iter().enumerate() {
            queue!(out, MoveTo(0, y as u16))?;
            let mut last: Option<(Option<Color>, Option<Color>)> = None;

            for cell in row {
                // Only emit colour changes
                if last != Some((cell.fg, cell.bg)) {
                    queue!(out, ResetColor)?;
                    if let Some(fg) = cell.fg {
                        queue!(out, SetForegroundColor(fg))?;
                    }
                    if let Some(bg) = cell.bg {
                        queue!(out, SetBackgroundColor(bg))?;
                    }
                    last = Some((cell.fg, cell.bg));
                }
                queue!(out, Print(cell.ch))?;
            }
        }

        queue!(out, ResetColor)?;
        out.flush()?;
        Ok(())
    }

    /// Check for keypress (non-blocking), returns (code, modifiers)
    pub fn check_key(&self) -> io::Result<Option<(KeyCode, KeyModifiers)>> {
        if poll(Duration::from_millis(0))? {
            if let Event::Key(key_event) = read()? {
                return Ok(Some((key_event.code, key_event.modifiers)));
            }
        }
        Ok(None)
    }

    /// Sleep for specified duration
    pub fn sleep(&self, seconds: f32) {
        std::thread::sleep(Duration::from_secs_f32(seconds.max(0.0)));
    }

    /// Print buffer to stdout with 24-bit ANSI colors (for print mode)
    pub fn print_to_stdout(&self) {
        for row in &self.buffer {
            for cell in row {
                if let Some(Color::Rgb { r, g, b }) = cell.fg {
                    print!("\x1b[38;2;{};{};{}m", r, g, b);
                }
                if let Some(Color::Rgb { r, g, b }) = cell.bg {
                    print!("\x1b[48;2;{};{};{}m", r, g, b);
                }
                print!("{}", cell.ch);
            }
            println!("\x1b[0m");
        }
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        if self.alternate_screen {
            let _ = execute!(stdout(), ResetColor, Show, LeaveAlternateScreen);
            let _ = disable_raw_mode();
        }
    }
}
