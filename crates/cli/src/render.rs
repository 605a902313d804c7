//! Menu screen rendering
//!
//! Everything renders to a `String` so the caller decides where it goes.

use menu_core::menu::{MenuView, ProductCard};
use owo_colors::OwoColorize;

/// Widths of the placeholder chips shown while categories load
const CHIP_SKELETON_WIDTHS: [usize; 8] = [6, 7, 9, 7, 10, 8, 6, 9];

/// Placeholder chips shown while loading
const CHIP_SKELETON_COUNT: usize = 6;

/// Placeholder cards shown while products load
const CARD_SKELETON_COUNT: usize = 3;

/// Hint below the empty-state heading
pub const EMPTY_STATE_HINT: &str = "Try another category or use search above.";

/// Renders the menu for a terminal of a given width
#[derive(Debug, Clone, Copy)]
pub struct Renderer {
    color: bool,
    width: usize,
}

impl Renderer {
    /// Renderer with explicit color support and width
    pub fn new(color: bool, width: usize) -> Self {
        Self {
            color,
            width: width.clamp(32, 100),
        }
    }

    /// Renderer matching the attached stdout
    pub fn detect() -> Self {
        let term = console::Term::stdout();
        let width = term.size_checked().map_or(80, |(_, cols)| usize::from(cols));
        Self::new(console::colors_enabled() && term.is_term(), width)
    }

    /// Whole menu screen: chip row, search line, then cards or a placeholder
    pub fn menu(&self, view: &MenuView) -> String {
        let mut out = String::new();

        if view.chip_ready() {
            out.push_str(&self.chips(&view.chips(), view.selected()));
        } else {
            out.push_str(&self.chips_skeleton());
        }
        out.push('\n');

        if !view.search().is_empty() {
            out.push_str(&self.dim(&format!("Search: \u{201c}{}\u{201d}", view.search())));
            out.push('\n');
        }
        out.push('\n');

        if view.is_loading_products() {
            out.push_str(&self.cards_skeleton(CARD_SKELETON_COUNT));
            return out;
        }

        let cards = view.cards();
        if cards.is_empty() {
            out.push_str(&self.empty_state(&view.empty_state_title()));
            return out;
        }

        for card in &cards {
            out.push_str(&self.card(card, view.placeholder_image()));
            out.push('\n');
        }
        out
    }

    /// Chip row, the selected chip bracketed
    pub fn chips(&self, chips: &[String], selected: &str) -> String {
        chips
            .iter()
            .map(|chip| {
                if chip == selected {
                    let label = format!("[{chip}]");
                    if self.color {
                        label.bold().cyan().to_string()
                    } else {
                        label
                    }
                } else {
                    format!(" {chip} ")
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Grey bars standing in for chips
    pub fn chips_skeleton(&self) -> String {
        let bars = CHIP_SKELETON_WIDTHS
            .iter()
            .cycle()
            .take(CHIP_SKELETON_COUNT)
            .map(|w| "░".repeat(*w))
            .collect::<Vec<_>>()
            .join(" ");
        self.dim(&bars)
    }

    /// Grey bars standing in for product cards
    pub fn cards_skeleton(&self, count: usize) -> String {
        let inner = self.width.saturating_sub(4);
        let mut out = String::new();
        for _ in 0..count {
            for percent in [70, 50, 40] {
                let bar = "░".repeat(inner * percent / 100);
                out.push_str("  ");
                out.push_str(&self.dim(&bar));
                out.push('\n');
            }
            out.push('\n');
        }
        out
    }

    /// One product: name and price on a line, then description and image
    pub fn card(&self, card: &ProductCard, placeholder: &str) -> String {
        let inner = self.width.saturating_sub(4);
        let price_width = console::measure_text_width(&card.price);
        let name_room = inner.saturating_sub(price_width + 1);
        let name = console::truncate_str(&card.name, name_room, "…");
        let gap = inner
            .saturating_sub(console::measure_text_width(&name) + price_width)
            .max(1);

        let mut out = String::new();
        out.push_str("  ");
        if self.color {
            out.push_str(&format!("{}{}{}", name.bold(), " ".repeat(gap), card.price.green()));
        } else {
            out.push_str(&format!("{name}{}{}", " ".repeat(gap), card.price));
        }
        out.push('\n');

        if !card.description.is_empty() {
            out.push_str("  ");
            out.push_str(&console::truncate_str(&card.description, inner, "…"));
            out.push('\n');
        }

        let image = card.image.display(placeholder);
        out.push_str("  ");
        out.push_str(&self.dim(&console::truncate_str(&image, inner, "…")));
        out.push('\n');
        out
    }

    /// Heading and hint for a filter with no results
    pub fn empty_state(&self, title: &str) -> String {
        let heading = if self.color {
            title.bold().to_string()
        } else {
            title.to_string()
        };
        format!("  {heading}\n  {}\n", self.dim(EMPTY_STATE_HINT))
    }

    fn dim(&self, text: &str) -> String {
        if self.color {
            text.dimmed().to_string()
        } else {
            text.to_string()
        }
    }
}
