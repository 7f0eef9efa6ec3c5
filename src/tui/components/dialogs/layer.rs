//! Layout and layering for the visible part of a dialog stack
//!
//! Each visible dialog becomes a [`FrameLayer`]: a rectangle pushed down by
//! its offset, a z-index, and the hit areas of its footer buttons. Layers
//! are kept in z-order so rendering and hit testing agree on what is on top.

use super::navigation::{contains, ButtonKind, FooterAreas, NavigationButtons, NavigationProps};
use super::sequence::SequenceState;
use super::types::DialogId;
use ratatui::layout::Rect;

/// Offset units between successive frames
pub const DEFAULT_STEP: u16 = 8;
/// Offset units that make up one terminal row
pub const DEFAULT_CELL_HEIGHT: u16 = 8;
/// Stacking value of the first frame
pub const DEFAULT_BASE_Z_INDEX: i32 = 50;
/// Widest a frame grows, borders included
pub const DEFAULT_FRAME_WIDTH: u16 = 56;

/// Border plus one column of padding on each side
const HORIZONTAL_CHROME: u16 = 4;
/// Top and bottom border, the spacer row and the footer row
const VERTICAL_CHROME: u16 = 4;

/// Tunables for how frames are sized and spaced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StackGeometry {
    pub step: u16,
    pub cell_height: u16,
    pub base_z_index: i32,
    pub frame_width: u16,
}

impl Default for StackGeometry {
    fn default() -> Self {
        Self {
            step: DEFAULT_STEP,
            cell_height: DEFAULT_CELL_HEIGHT,
            base_z_index: DEFAULT_BASE_Z_INDEX,
            frame_width: DEFAULT_FRAME_WIDTH,
        }
    }
}

impl StackGeometry {
    /// Vertical offset of the frame at `position` with the cursor at `current_index`.
    ///
    /// `(position - current_index) * step + current_index * step`, which
    /// reduces to `position * step`: the active frame sits lowest.
    pub fn offset(&self, position: usize, current_index: usize) -> u32 {
        let step = i64::from(self.step);
        let relative = (position as i64 - current_index as i64) * step;
        (relative + current_index as i64 * step) as u32
    }

    pub fn z_index(&self, position: usize) -> i32 {
        self.base_z_index.saturating_add(position as i32)
    }

    /// Whole terminal rows covered by an offset
    pub fn rows_for_offset(&self, offset: u32) -> u16 {
        let rows = offset / u32::from(self.cell_height.max(1));
        rows.min(u32::from(u16::MAX)) as u16
    }
}

/// One visible dialog, placed and layered
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameLayer {
    pub position: usize,
    pub dialog_id: DialogId,
    pub title: String,
    pub description_lines: Vec<String>,
    pub offset: u32,
    pub z_index: i32,
    pub is_current: bool,
    pub buttons: NavigationButtons,
    pub area: Rect,
    pub footer: FooterAreas,
}

impl FrameLayer {
    /// Area inside the border
    pub fn inner_area(&self) -> Rect {
        Rect {
            x: self.area.x.saturating_add(1),
            y: self.area.y.saturating_add(1),
            width: self.area.width.saturating_sub(2),
            height: self.area.height.saturating_sub(2),
        }
    }

    /// Area for the description, padded one column from the border
    pub fn content_area(&self) -> Rect {
        let inner = self.inner_area();
        Rect {
            x: inner.x.saturating_add(1),
            y: inner.y,
            width: inner.width.saturating_sub(2),
            height: inner.height.saturating_sub(2),
        }
    }

    pub fn footer_area(&self) -> Rect {
        let inner = self.inner_area();
        Rect {
            x: inner.x.saturating_add(1),
            y: inner.y + inner.height.saturating_sub(1),
            width: inner.width.saturating_sub(2),
            height: inner.height.min(1),
        }
    }

    pub fn contains_point(&self, x: u16, y: u16) -> bool {
        contains(self.area, x, y)
    }
}

/// What a click landed on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StackHit {
    PreviousButton(usize),
    NextButton(usize),
    Frame(usize),
    Backdrop,
}

/// Layers of an open stack, lowest z-index first
#[derive(Debug, Clone, Default)]
pub struct StackLayout {
    area: Rect,
    layers: Vec<FrameLayer>,
}

impl StackLayout {
    /// Lay out the visible dialogs of `state` inside `area`
    pub fn calculate(state: &SequenceState, geometry: &StackGeometry, area: Rect) -> Self {
        let current_index = state.current_index();
        let can_advance = state.can_advance();
        let can_retreat = state.can_retreat();

        let mut layers: Vec<FrameLayer> = state
            .visible()
            .iter()
            .enumerate()
            .map(|(position, dialog)| {
                let width = geometry.frame_width.min(area.width);
                let text_width = usize::from(width.saturating_sub(HORIZONTAL_CHROME).max(1));
                let description_lines: Vec<String> = textwrap::wrap(&dialog.description, text_width)
                    .into_iter()
                    .map(|line| line.into_owned())
                    .collect();
                let text_rows = u16::try_from(description_lines.len().max(1)).unwrap_or(u16::MAX);
                let height = text_rows.saturating_add(VERTICAL_CHROME).min(area.height);

                let offset = geometry.offset(position, current_index);
                let x = area.x + (area.width - width) / 2;
                let centered_y = area.y + (area.height - height) / 2;
                let lowest_y = area.y + area.height - height;
                let y = centered_y
                    .saturating_add(geometry.rows_for_offset(offset))
                    .min(lowest_y);

                let is_current = position == current_index;
                let buttons = NavigationButtons::new(NavigationProps {
                    is_current_frame: is_current,
                    can_advance,
                    can_retreat,
                });

                let mut layer = FrameLayer {
                    position,
                    dialog_id: dialog.id.clone(),
                    title: dialog.title.clone(),
                    description_lines,
                    offset,
                    z_index: geometry.z_index(position),
                    is_current,
                    buttons,
                    area: Rect { x, y, width, height },
                    footer: FooterAreas::default(),
                };
                layer.footer = FooterAreas::calculate(&buttons, layer.footer_area());
                layer
            })
            .collect();

        layers.sort_by_key(|layer| layer.z_index);
        Self { area, layers }
    }

    /// Layers in rendering order
    pub fn layers(&self) -> &[FrameLayer] {
        &self.layers
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    pub fn current_layer(&self) -> Option<&FrameLayer> {
        self.layers.iter().find(|layer| layer.is_current)
    }

    /// Topmost thing under a point, or `None` when closed or outside the area
    pub fn hit_test(&self, x: u16, y: u16) -> Option<StackHit> {
        if self.layers.is_empty() || !contains(self.area, x, y) {
            return None;
        }

        let hit = self
            .layers
            .iter()
            .rev()
            .find(|layer| layer.contains_point(x, y))
            .map(|layer| match layer.footer.button_at(x, y) {
                Some(ButtonKind::Previous) => StackHit::PreviousButton(layer.position),
                Some(ButtonKind::Next) => StackHit::NextButton(layer.position),
                None => StackHit::Frame(layer.position),
            })
            .unwrap_or(StackHit::Backdrop);

        Some(hit)
    }
}
