//! Layout helpers shared by the views.

use ratatui::prelude::*;

/// Braille spinner frames, advanced on every fast tick while requests run.
pub const THROBBER_FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Center a rectangle sized as a percentage of `r`, clamped between `min`
/// and `max` (only their width and height are used) and never exceeding `r`.
pub fn centered_min_max(percent_x: u16, percent_y: u16, min: Rect, max: Rect, r: Rect) -> Rect {
    let width = (r.width as u32 * percent_x as u32 / 100) as u16;
    let height = (r.height as u32 * percent_y as u32 / 100) as u16;
    let width = width.clamp(min.width, max.width).min(r.width);
    let height = height.clamp(min.height, max.height).min(r.height);
    Rect {
        x: r.x + (r.width - width) / 2,
        y: r.y + (r.height - height) / 2,
        width,
        height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centered_min_max_clamps_and_centers() {
        let area = Rect::new(0, 0, 100, 40);
        let rect = centered_min_max(45, 35, Rect::new(0, 0, 60, 10), Rect::new(0, 0, 80, 12), area);
        assert_eq!(rect, Rect::new(20, 14, 60, 12));

        let tiny = Rect::new(0, 0, 30, 5);
        let rect = centered_min_max(45, 35, Rect::new(0, 0, 60, 10), Rect::new(0, 0, 80, 12), tiny);
        assert_eq!(rect, Rect::new(0, 0, 30, 5));
    }
}
