//! MiniTab panel toggles (chat, summary, notes) shown inside the overlay.

use serde::{Deserialize, Serialize};

/// Event the overlay listens on for panel changes.
pub const PANELS_EVENT: &str = "overlay:panels";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Panel {
    Chat,
    Summary,
    Notes,
}

impl Panel {
    pub const ALL: [Panel; 3] = [Panel::Chat, Panel::Summary, Panel::Notes];
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PanelSet {
    pub chat: bool,
    pub summary: bool,
    pub notes: bool,
}

impl PanelSet {
    fn slot(&mut self, panel: Panel) -> &mut bool {
        match panel {
            Panel::Chat => &mut self.chat,
            Panel::Summary => &mut self.summary,
            Panel::Notes => &mut self.notes,
        }
    }

    pub fn is_open(&self, panel: Panel) -> bool {
        match panel {
            Panel::Chat => self.chat,
            Panel::Summary => self.summary,
            Panel::Notes => self.notes,
        }
    }

    /// Flip one panel; returns the new state.
    pub fn toggle(&mut self, panel: Panel) -> bool {
        let slot = self.slot(panel);
        *slot = !*slot;
        *slot
    }

    /// Returns true if anything was open.
    pub fn close_all(&mut self) -> bool {
        let was_open = self.any_open();
        *self = Self::default();
        was_open
    }

    pub fn any_open(&self) -> bool {
        self.chat || self.summary || self.notes
    }

    pub fn open_panels(&self) -> impl Iterator<Item = Panel> + '_ {
        Panel::ALL.into_iter().filter(|p| self.is_open(*p))
    }
}
