//! Equations sidebar UI for the starfield
//!
//! Displays the force and orbit formulas driving the simulation using egui.

use egui::{Context, RichText, Color32};

/// An equation with its name and formula
pub struct Equation {
    pub name: &'static str,
    pub formula: &'static str,
    pub description: &'static str,
}

/// Draw the equations sidebar, with a live readout of the scene on top
pub fn draw_equations_sidebar(
    ctx: &Context,
    title: &str,
    readout: &[(&str, String)],
    equations: &[Equation],
    variables: &[(&str, &str)],
) {
    egui::SidePanel::right("equations_panel")
        .resizable(true)
        .default_width(280.0)
        .show(ctx, |ui| {
            ui.heading(RichText::new(title).color(Color32::LIGHT_BLUE));
            ui.separator();

            egui::Grid::new("readout_grid")
                .num_columns(2)
                .spacing([10.0, 2.0])
                .show(ui, |ui| {
                    for (name, value) in readout {
                        ui.label(RichText::new(*name).small());
                        ui.label(RichText::new(value).monospace().color(Color32::LIGHT_GRAY));
                        ui.end_row();
                    }
                });
            ui.separator();

            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.collapsing(RichText::new("📐 Equations").strong(), |ui| {
                    for eq in equations {
                        ui.group(|ui| {
                            ui.label(RichText::new(eq.name).strong().color(Color32::YELLOW));
                            ui.label(RichText::new(eq.formula).monospace().color(Color32::WHITE));
                            ui.label(RichText::new(eq.description).small().italics());
                        });
                        ui.add_space(4.0);
                    }
                });

                ui.add_space(8.0);

                ui.collapsing(RichText::new("📖 Variables").strong(), |ui| {
                    egui::Grid::new("variables_grid")
                        .num_columns(2)
                        .spacing([10.0, 4.0])
                        .show(ui, |ui| {
                            for (symbol, meaning) in variables {
                                ui.label(RichText::new(*symbol).monospace().color(Color32::LIGHT_GREEN));
                                ui.label(*meaning);
                                ui.end_row();
                            }
                        });
                });
            });
        });
}

pub const STARFIELD_EQUATIONS: &[Equation] = &[
    Equation {
        name: "Softened Galaxy Pull",
        formula: "Δv = M·r̂ / (ε + |r⃗|²)",
        description: "Per-step velocity kick toward a galaxy, ε = 3×10⁻⁴",
    },
    Equation {
        name: "Attractor Pull",
        formula: "Δv = k·d⃗ / (δ + |d⃗|²),  d⃗ = t⃗ - (p⃗ + λ·v⃗)",
        description: "Fingertip pull aimed ahead of the body, k = 2×10⁻⁴",
    },
    Equation {
        name: "Circular Orbit Speed",
        formula: "v = √(M / r),  v̂ = n̂ × r̂",
        description: "Initial star velocity around its disc",
    },
    Equation {
        name: "Disc Flattening",
        formula: "r⃗' = r⃗ - 0.4·atan((r⃗·n̂)/0.5)·n̂",
        description: "Smoothly squashes the cloud into a disc",
    },
    Equation {
        name: "Predictor / Corrector",
        formula: "p⃗' = p⃗ + 0.25·ṽ + 0.75·v⃗'",
        description: "ṽ sampled at p⃗, v⃗' at p⃗ + 0.667·ṽ",
    },
    Equation {
        name: "Escape Recycling",
        formula: "|p⃗ - e⃗|² > 50  ⇒  p⃗ = e⃗ - 10·v⃗ + 0.5·f̂",
        description: "Lost stars reappear in front of the viewer",
    },
];

pub const STARFIELD_VARIABLES: &[(&str, &str)] = &[
    ("M", "Galaxy mass (stars × 5×10⁻¹¹)"),
    ("r⃗", "Offset to the galaxy center"),
    ("n̂", "Disc spin axis"),
    ("t⃗", "Attractor position"),
    ("λ", "Lookahead (0.1 + 10⁻⁴·kind)"),
    ("p⃗, v⃗", "Body position, velocity"),
    ("e⃗, f̂", "Eye position, view direction"),
];
