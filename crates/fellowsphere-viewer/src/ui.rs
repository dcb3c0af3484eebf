//! Details panel and quick-pick buttons.
//!
//! A side panel lists every location as a quick-pick button and shows the
//! selected location's mentors, or a prompt when nothing is selected.
//! Clicks inside the panel are resolved into actions after rendering, at the
//! end of the frame's UI pass.

use bevy::prelude::*;
use bevy_egui::{EguiContexts, EguiPlugin, EguiPrimaryContextPass, egui};

use crate::camera::AutoRotate;
use crate::content::{ContentState, Locations};
use crate::picking::{GlobeSelection, select_by_name};

/// Plugin for the panel UI.
pub struct PanelUiPlugin;

impl Plugin for PanelUiPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(EguiPlugin::default())
            .add_systems(EguiPrimaryContextPass, panel_ui_system);
    }
}

/// Render the side panel and apply any resulting selection actions.
#[allow(clippy::needless_pass_by_value)]
fn panel_ui_system(
    mut contexts: EguiContexts,
    time: Res<Time>,
    locations: Res<Locations>,
    content_state: Res<ContentState>,
    mut selection: ResMut<GlobeSelection>,
    mut auto_rotate: ResMut<AutoRotate>,
) -> Result {
    let ctx = contexts.ctx_mut()?;

    // Collect actions during rendering, apply them after.
    let mut picked: Option<String> = None;
    let mut dismiss = false;

    egui::SidePanel::right("location_panel")
        .default_width(320.0)
        .show(ctx, |ui| {
            ui.heading("Fellowship Training");

            if content_state.is_loading {
                ui.horizontal(|ui| {
                    ui.spinner();
                    ui.label("Loading locations...");
                });
            } else if let Some(ref error) = content_state.error {
                ui.colored_label(egui::Color32::RED, format!("Content: {error}"));
            }

            ui.separator();
            ui.horizontal_wrapped(|ui| {
                for location in locations.iter() {
                    if ui.button(&location.name).clicked() {
                        picked = Some(location.name.clone());
                    }
                }
            });
            ui.separator();

            let selected = selection.selected().and_then(|index| locations.get(index));
            match selected {
                Some(location) => {
                    ui.horizontal(|ui| {
                        ui.heading(&location.name);
                        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                            if ui.button("Close").clicked() {
                                dismiss = true;
                            }
                        });
                    });
                    ui.label(&location.country);
                    if !location.description.is_empty() {
                        ui.label(&location.description);
                    }
                    ui.separator();

                    egui::ScrollArea::vertical().show(ui, |ui| {
                        for mentor in &location.mentors {
                            ui.label(egui::RichText::new(&mentor.name).strong());
                            if !mentor.title.is_empty() {
                                ui.label(egui::RichText::new(&mentor.title).italics());
                            }
                            if !mentor.bio.is_empty() {
                                ui.label(&mentor.bio);
                            }
                            if !mentor.expertise.is_empty() {
                                ui.horizontal_wrapped(|ui| {
                                    for tag in &mentor.expertise {
                                        ui.label(egui::RichText::new(tag).small().weak());
                                    }
                                });
                            }
                            ui.add_space(8.0);
                        }
                    });
                }
                None => {
                    ui.label("Click a marker on the globe, or pick a location above, to see \
                              the mentors there.");
                }
            }
        });

    if dismiss {
        selection.state.dismiss();
    }
    if let Some(name) = picked {
        select_by_name(
            &name,
            &locations,
            &mut selection,
            &mut auto_rotate,
            time.elapsed_secs_f64(),
        );
    }

    Ok(())
}
