// src/ui/panel.rs
//! Settings panel for the viewer
//!
//! A small ImGui window holding the wireframe checkbox plus a read-only
//! summary of the scene. The panel edits host-owned [`ViewerSettings`]; it
//! never touches the scene directly.

use crate::gfx::scene::SceneStatistics;

/// Host-owned state the settings panel edits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ViewerSettings {
    pub wireframe: bool,
}

/// What the user changed in the panel during one frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PanelChanges {
    pub wireframe: Option<bool>,
}

impl PanelChanges {
    pub fn is_empty(&self) -> bool {
        self.wireframe.is_none()
    }
}

/// Draws the settings window and reports what changed
///
/// # Arguments
/// * `ui` - ImGui UI context
/// * `settings` - Settings bound to the widgets
/// * `stats` - Scene statistics shown below the controls
pub fn settings_panel(
    ui: &imgui::Ui,
    settings: &mut ViewerSettings,
    stats: &SceneStatistics,
) -> PanelChanges {
    let display_size = ui.io().display_size;
    if display_size[0] <= 0.0 || display_size[1] <= 0.0 {
        return PanelChanges::default();
    }

    ui.window("Settings")
        .size([260.0, 0.0], imgui::Condition::FirstUseEver)
        .position([16.0, 16.0], imgui::Condition::FirstUseEver)
        .always_auto_resize(true)
        .collapsible(true)
        .build(|| settings_contents(ui, settings, stats))
        .unwrap_or_default()
}

fn settings_contents(
    ui: &imgui::Ui,
    settings: &mut ViewerSettings,
    stats: &SceneStatistics,
) -> PanelChanges {
    let mut changes = PanelChanges::default();

    if ui.checkbox("Wireframe", &mut settings.wireframe) {
        changes.wireframe = Some(settings.wireframe);
    }

    ui.separator();
    ui.text_disabled(format!(
        "{} vertices, {} triangles",
        stats.total_vertices, stats.total_triangles
    ));
    ui.text_disabled("Drag: orbit   Shift+drag: pan");
    ui.text_disabled("Wheel: zoom   Shift+C: reset");

    changes
}
