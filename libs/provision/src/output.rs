//! Terminal output helpers shared by both setup utilities

use colored::Colorize;
use inquire::ui::Color;

/// Teal theme color - single source of truth for RGB values
/// Uses (0, 175, 175) to exactly match xterm-256 color 37 for consistency
pub const TEAL: (u8, u8, u8) = (0, 175, 175);

/// Teal theme color (for inquire prompts) - derived from TEAL
pub const TEAL_RGB: Color = Color::Rgb {
    r: TEAL.0,
    g: TEAL.1,
    b: TEAL.2,
};

/// Calculate nearest xterm-256 color index from RGB
///
/// The xterm-256 palette (colors 16-231) is a 6×6×6 RGB cube where each
/// component maps to values: 0, 95, 135, 175, 215, 255.
/// Formula: 16 + (36 × `r_idx`) + (6 × `g_idx`) + `b_idx`
const fn rgb_to_xterm256(r: u8, g: u8, b: u8) -> u8 {
    const fn nearest_idx(val: u8) -> u8 {
        if val < 48 {
            0
        } else if val < 115 {
            1
        } else if val < 155 {
            2
        } else if val < 195 {
            3
        } else if val < 235 {
            4
        } else {
            5
        }
    }
    16 + 36 * nearest_idx(r) + 6 * nearest_idx(g) + nearest_idx(b)
}

/// Teal theme color (xterm-256 color code for indicatif) - derived from TEAL
pub const TEAL_256: u8 = rgb_to_xterm256(TEAL.0, TEAL.1, TEAL.2);

/// Calculate terminal display width, treating emojis as 2 cells wide
///
/// Terminals typically render emojis as 2 cells wide regardless of Unicode
/// Standard Annex #11 width properties, so we use a terminal-specific calculation.
fn terminal_width(s: &str) -> usize {
    use unicode_width::UnicodeWidthChar;
    s.chars()
        .map(|c| {
            if c.is_ascii() {
                1
            } else {
                // Non-ASCII: use unicode width but minimum 2 for visible chars (emojis)
                let w = UnicodeWidthChar::width(c).unwrap_or(0);
                if w > 0 { 2 } else { 0 }
            }
        })
        .sum()
}

/// Print a styled title bar with teal separator matching the title width
pub fn print_title_bar(title: &str) {
    println!("{}", title.bold().bright_white());
    let width = terminal_width(title);
    let separator: String = "─".repeat(width);
    println!("{}", separator.truecolor(TEAL.0, TEAL.1, TEAL.2));
}

/// Print a subdued subtitle bar with gray separator matching the title width
pub fn print_subtitle_bar(title: &str) {
    println!("{}", title.white());
    let width = terminal_width(title);
    let separator: String = "─".repeat(width);
    println!("{}", separator.dimmed());
}

/// Display a success message
pub fn success(message: &str) {
    if message.is_empty() {
        println!("  {}", "✓".green());
    } else {
        println!("  {} {}", "✓".green(), message);
    }
}

/// Display a warning message
pub fn warning(message: &str) {
    println!("  {} {}", "⚠".bold().yellow(), message);
}

/// Display an info message
pub fn info(message: &str) {
    println!("  • {message}");
}

/// Create teal-themed render config for inquire prompts
///
/// Uses 2-space indent prefix to align with `success`/`info` output style.
pub fn create_teal_theme() -> inquire::ui::RenderConfig<'static> {
    inquire::ui::RenderConfig {
        prompt_prefix: inquire::ui::Styled::new("  ?").with_fg(TEAL_RGB),
        answered_prompt_prefix: inquire::ui::Styled::new("  ✓").with_fg(TEAL_RGB),
        answer: inquire::ui::StyleSheet::new().with_fg(TEAL_RGB),
        ..Default::default()
    }
}
