use ratatui::style::Color;

/// Colours for the replay panes
pub struct Theme {
    pub fg: Color,
    pub comment: Color,
    /// Step counter and bracket punctuation
    pub accent: Color,
    /// Characters that changed since the previous snapshot
    pub highlight: Color,
    pub changed_bg: Color,
    /// Print steps
    pub output: Color,
    pub alert: Color,
    /// For and If steps, source keywords
    pub keyword: Color,
    pub number: Color,
    /// Call and Define steps
    pub function: Color,
    /// Return and End-call steps
    pub return_value: Color,
    pub border_focused: Color,
    pub border_normal: Color,
    pub current_line_bg: Color,
}

pub const DEFAULT_THEME: Theme = Theme {
    fg: Color::Rgb(205, 214, 244),
    comment: Color::Rgb(108, 112, 134),
    accent: Color::Rgb(137, 180, 250),
    highlight: Color::Rgb(250, 179, 135),
    changed_bg: Color::Rgb(88, 70, 40),
    output: Color::Rgb(166, 227, 161),
    alert: Color::Rgb(243, 139, 168),
    keyword: Color::Rgb(203, 166, 247),
    number: Color::Rgb(250, 179, 135),
    function: Color::Rgb(249, 226, 175),
    return_value: Color::Rgb(245, 194, 231),
    border_focused: Color::Rgb(249, 226, 175),
    border_normal: Color::Rgb(69, 71, 90),
    current_line_bg: Color::Rgb(49, 50, 68),
};
