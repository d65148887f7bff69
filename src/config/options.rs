//! Typed renderer options and their scheduling side effects.
//!
//! Every option a host can change at runtime is a variant of
//! [`RendererOption`]. Applying one to a [`RendererConfig`] updates the named
//! field and returns an [`OptionEffect`] telling the renderer what must be
//! recomputed. The full table is [`RendererOption::NAMES`] plus
//! [`RendererConfig::apply`]; nothing is hidden in closures.

use super::RendererConfig;
use crate::model::{ChangeMask, OptionError, ScrollMargin};

/// A single runtime option change.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RendererOption {
    /// Animate `scroll_to_line` jumps.
    AnimatedScroll(bool),
    /// Render whitespace markers.
    ShowInvisibles(bool),
    /// Draw the print margin line.
    ShowPrintMargin(bool),
    /// Column of the print margin.
    PrintMarginColumn(u32),
    /// Show the gutter.
    ShowGutter(bool),
    /// Show line numbers in the gutter.
    ShowLineNumbers(bool),
    /// Show fold widgets in the gutter.
    ShowFoldWidgets(bool),
    /// Fade fold widgets until hovered.
    FadeFoldWidgets(bool),
    /// Draw indent guides.
    DisplayIndentGuides(bool),
    /// Highlight the gutter cell of the cursor row.
    HighlightGutterLine(bool),
    /// Force the horizontal scrollbar visible.
    HScrollBarAlwaysVisible(bool),
    /// Force the vertical scrollbar visible.
    VScrollBarAlwaysVisible(bool),
    /// Autosize cap in lines; `None` disables autosize.
    MaxLines(Option<u32>),
    /// Autosize floor in lines.
    MinLines(Option<u32>),
    /// Overscroll allowance as a fraction of the viewport height.
    ScrollPastEnd(f64),
    /// Keep the gutter width fixed as line numbers grow.
    FixedWidthGutter(bool),
    /// Horizontal text padding in pixels.
    Padding(f64),
    /// Extra scrollable margin around the content.
    ScrollMargin(ScrollMargin),
}

/// What the renderer must do after an option changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionEffect {
    /// Nothing visible depends on the option, or the value was unchanged.
    None,
    /// Schedule the given change reasons.
    Schedule(ChangeMask),
    /// Schedule a full update (`update_full(false)`).
    UpdateFull,
    /// Gutter visibility changed: schedule `FULL` and recompute gutter width.
    GutterResized,
    /// Refresh the active-line gutter highlight.
    GutterHighlight,
    /// A scrollbar policy changed; schedule `SCROLL` unless that bar is
    /// already both forced and shown.
    ScrollbarPolicy {
        /// True for the horizontal bar.
        horizontal: bool,
    },
    /// Scroll margin changed: re-anchor a top-resting view and update fully.
    ScrollMargin,
    /// Print margin moved or toggled: re-derive the wrap limit.
    PrintMargin,
}

const BOOL_EXPECTED: &str = "true or false";
const UINT_EXPECTED: &str = "a non-negative integer";
const OPT_UINT_EXPECTED: &str = "a non-negative integer or 'none'";
const FLOAT_EXPECTED: &str = "a finite number";
const MARGIN_EXPECTED: &str = "four numbers 'top,bottom,left,right'";

impl RendererOption {
    /// Every option name accepted by [`RendererOption::parse`].
    pub const NAMES: &'static [&'static str] = &[
        "animatedScroll",
        "showInvisibles",
        "showPrintMargin",
        "printMarginColumn",
        "showGutter",
        "showLineNumbers",
        "showFoldWidgets",
        "fadeFoldWidgets",
        "displayIndentGuides",
        "highlightGutterLine",
        "hScrollBarAlwaysVisible",
        "vScrollBarAlwaysVisible",
        "maxLines",
        "minLines",
        "scrollPastEnd",
        "fixedWidthGutter",
        "padding",
        "scrollMargin",
    ];

    /// Parse a `name`/`value` pair as given on a command line.
    ///
    /// # Errors
    ///
    /// Returns [`OptionError::UnknownOption`] for names outside
    /// [`RendererOption::NAMES`] and [`OptionError::InvalidValue`] when the
    /// value does not fit the option's type.
    pub fn parse(name: &str, value: &str) -> Result<Self, OptionError> {
        let value = value.trim();
        let option = match name {
            "animatedScroll" => Self::AnimatedScroll(parse_bool(name, value)?),
            "showInvisibles" => Self::ShowInvisibles(parse_bool(name, value)?),
            "showPrintMargin" => Self::ShowPrintMargin(parse_bool(name, value)?),
            "printMarginColumn" => Self::PrintMarginColumn(parse_uint(name, value)?),
            "showGutter" => Self::ShowGutter(parse_bool(name, value)?),
            "showLineNumbers" => Self::ShowLineNumbers(parse_bool(name, value)?),
            "showFoldWidgets" => Self::ShowFoldWidgets(parse_bool(name, value)?),
            "fadeFoldWidgets" => Self::FadeFoldWidgets(parse_bool(name, value)?),
            "displayIndentGuides" => Self::DisplayIndentGuides(parse_bool(name, value)?),
            "highlightGutterLine" => Self::HighlightGutterLine(parse_bool(name, value)?),
            "hScrollBarAlwaysVisible" => Self::HScrollBarAlwaysVisible(parse_bool(name, value)?),
            "vScrollBarAlwaysVisible" => Self::VScrollBarAlwaysVisible(parse_bool(name, value)?),
            "maxLines" => Self::MaxLines(parse_opt_uint(name, value)?),
            "minLines" => Self::MinLines(parse_opt_uint(name, value)?),
            "scrollPastEnd" => Self::ScrollPastEnd(parse_float(name, value)?),
            "fixedWidthGutter" => Self::FixedWidthGutter(parse_bool(name, value)?),
            "padding" => Self::Padding(parse_float(name, value)?),
            "scrollMargin" => Self::ScrollMargin(parse_margin(name, value)?),
            _ => return Err(OptionError::UnknownOption(name.to_string())),
        };
        Ok(option)
    }

    /// Canonical name of this option.
    pub fn name(&self) -> &'static str {
        match self {
            Self::AnimatedScroll(_) => "animatedScroll",
            Self::ShowInvisibles(_) => "showInvisibles",
            Self::ShowPrintMargin(_) => "showPrintMargin",
            Self::PrintMarginColumn(_) => "printMarginColumn",
            Self::ShowGutter(_) => "showGutter",
            Self::ShowLineNumbers(_) => "showLineNumbers",
            Self::ShowFoldWidgets(_) => "showFoldWidgets",
            Self::FadeFoldWidgets(_) => "fadeFoldWidgets",
            Self::DisplayIndentGuides(_) => "displayIndentGuides",
            Self::HighlightGutterLine(_) => "highlightGutterLine",
            Self::HScrollBarAlwaysVisible(_) => "hScrollBarAlwaysVisible",
            Self::VScrollBarAlwaysVisible(_) => "vScrollBarAlwaysVisible",
            Self::MaxLines(_) => "maxLines",
            Self::MinLines(_) => "minLines",
            Self::ScrollPastEnd(_) => "scrollPastEnd",
            Self::FixedWidthGutter(_) => "fixedWidthGutter",
            Self::Padding(_) => "padding",
            Self::ScrollMargin(_) => "scrollMargin",
        }
    }
}

impl RendererConfig {
    /// Store `option` and report the side effect the renderer must perform.
    ///
    /// Returns [`OptionEffect::None`] when the value is unchanged.
    pub fn apply(&mut self, option: RendererOption) -> OptionEffect {
        fn set<T: PartialEq>(slot: &mut T, value: T, effect: OptionEffect) -> OptionEffect {
            if *slot == value {
                OptionEffect::None
            } else {
                *slot = value;
                effect
            }
        }

        match option {
            RendererOption::AnimatedScroll(v) => set(&mut self.animated_scroll, v, OptionEffect::None),
            RendererOption::ShowInvisibles(v) => set(
                &mut self.show_invisibles,
                v,
                OptionEffect::Schedule(ChangeMask::TEXT),
            ),
            RendererOption::ShowPrintMargin(v) => {
                set(&mut self.show_print_margin, v, OptionEffect::PrintMargin)
            }
            RendererOption::PrintMarginColumn(v) => {
                set(&mut self.print_margin_column, v, OptionEffect::PrintMargin)
            }
            RendererOption::ShowGutter(v) => set(&mut self.show_gutter, v, OptionEffect::GutterResized),
            RendererOption::ShowLineNumbers(v) => set(
                &mut self.show_line_numbers,
                v,
                OptionEffect::Schedule(ChangeMask::GUTTER),
            ),
            RendererOption::ShowFoldWidgets(v) => set(
                &mut self.show_fold_widgets,
                v,
                OptionEffect::Schedule(ChangeMask::GUTTER),
            ),
            RendererOption::FadeFoldWidgets(v) => {
                set(&mut self.fade_fold_widgets, v, OptionEffect::None)
            }
            RendererOption::DisplayIndentGuides(v) => set(
                &mut self.display_indent_guides,
                v,
                OptionEffect::Schedule(ChangeMask::TEXT),
            ),
            RendererOption::HighlightGutterLine(v) => {
                set(&mut self.highlight_gutter_line, v, OptionEffect::GutterHighlight)
            }
            RendererOption::HScrollBarAlwaysVisible(v) => set(
                &mut self.h_scroll_bar_always_visible,
                v,
                OptionEffect::ScrollbarPolicy { horizontal: true },
            ),
            RendererOption::VScrollBarAlwaysVisible(v) => set(
                &mut self.v_scroll_bar_always_visible,
                v,
                OptionEffect::ScrollbarPolicy { horizontal: false },
            ),
            RendererOption::MaxLines(v) => set(&mut self.max_lines, v, OptionEffect::UpdateFull),
            RendererOption::MinLines(v) => set(&mut self.min_lines, v, OptionEffect::UpdateFull),
            RendererOption::ScrollPastEnd(v) => {
                let v = if v.is_finite() { v.max(0.0) } else { 0.0 };
                set(
                    &mut self.scroll_past_end,
                    v,
                    OptionEffect::Schedule(ChangeMask::SCROLL),
                )
            }
            RendererOption::FixedWidthGutter(v) => set(
                &mut self.fixed_width_gutter,
                v,
                OptionEffect::Schedule(ChangeMask::GUTTER),
            ),
            RendererOption::Padding(v) => set(
                &mut self.padding,
                v.max(0.0),
                OptionEffect::Schedule(ChangeMask::FULL),
            ),
            RendererOption::ScrollMargin(v) => set(&mut self.scroll_margin, v, OptionEffect::ScrollMargin),
        }
    }
}

fn invalid(name: &str, value: &str, expected: &'static str) -> OptionError {
    OptionError::InvalidValue {
        name: name.to_string(),
        value: value.to_string(),
        expected,
    }
}

fn parse_bool(name: &str, value: &str) -> Result<bool, OptionError> {
    match value {
        "true" | "on" | "1" => Ok(true),
        "false" | "off" | "0" => Ok(false),
        _ => Err(invalid(name, value, BOOL_EXPECTED)),
    }
}

fn parse_uint(name: &str, value: &str) -> Result<u32, OptionError> {
    value
        .parse::<u32>()
        .map_err(|_| invalid(name, value, UINT_EXPECTED))
}

fn parse_opt_uint(name: &str, value: &str) -> Result<Option<u32>, OptionError> {
    if value.eq_ignore_ascii_case("none") || value.is_empty() {
        return Ok(None);
    }
    value
        .parse::<u32>()
        .map(Some)
        .map_err(|_| invalid(name, value, OPT_UINT_EXPECTED))
}

fn parse_float(name: &str, value: &str) -> Result<f64, OptionError> {
    match value.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(invalid(name, value, FLOAT_EXPECTED)),
    }
}

fn parse_margin(name: &str, value: &str) -> Result<ScrollMargin, OptionError> {
    let parts: Vec<f64> = value
        .split(',')
        .map(|part| part.trim().parse::<f64>())
        .collect::<Result<_, _>>()
        .map_err(|_| invalid(name, value, MARGIN_EXPECTED))?;
    match parts.as_slice() {
        [top, bottom, left, right] if parts.iter().all(|p| p.is_finite()) => {
            Ok(ScrollMargin::new(*top, *bottom, *left, *right))
        }
        _ => Err(invalid(name, value, MARGIN_EXPECTED)),
    }
}
