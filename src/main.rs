use iced::widget::canvas::Canvas;
use iced::widget::image as iced_image;
use iced::widget::{
    button, checkbox, column, container, pick_list, row, scrollable, stack, text,
};
use iced::{Alignment, Element, Length, Task, Theme};
use iced_aw::Wrap;
use rfd::FileDialog;
use std::path::PathBuf;

mod batch;
mod catalog;
mod compose;
mod editor;
mod error;
mod state;
mod ui;

use batch::{GeneratedArtifact, SourceFile};
use catalog::{OutputPreset, StoreProfile};
use compose::engine::{ComposeMode, PresentationOptions};
use state::bezels::BezelRegistry;
use state::margins::{MarginRecord, MarginStore};
use state::session::Session;
use ui::editor_canvas::MarginEditor;

/// Fixed size of the margin editor preview surface
const EDITOR_W: f32 = 480.0;
const EDITOR_H: f32 = 320.0;
/// Preview card width in the results grid
const PREVIEW_W: f32 = 240.0;

/// Result of a background batch render
#[derive(Debug, Clone)]
pub struct BatchOutcome {
    artifacts: Vec<GeneratedArtifact>,
    failed_files: Vec<(String, String)>,
    missing_bezels: Vec<String>,
    /// Set when the batch could not run at all (e.g. nothing decodable)
    error: Option<String>,
}

/// Main application state
struct BezelStudio {
    /// Margin records and bezel assets
    session: Session,
    /// Screenshot files queued for the next batch
    screenshots: Vec<PathBuf>,
    /// Presentation options applied to every composition
    options: PresentationOptions,
    /// Target store profile and device group
    profile: StoreProfile,
    group: &'static str,
    /// Preset currently open in the margin editor
    editor_preset: &'static OutputPreset,
    /// Cached iced handle for the editor preset's bezel asset, if uploaded
    editor_asset_handle: Option<iced_image::Handle>,
    /// Artifacts from the last completed batch, kept for export
    artifacts: Vec<GeneratedArtifact>,
    /// (filename, handle) pairs backing the preview grid
    previews: Vec<(String, iced_image::Handle)>,
    /// Status message to display to the user
    status: String,
    /// True while a batch render is in flight
    running: bool,
}

/// Application messages (events)
#[derive(Debug, Clone)]
pub enum Message {
    /// User clicked "Add Screenshots"
    PickScreenshots,
    /// User clicked "Clear" to drop queued screenshots and results
    ClearScreenshots,
    /// User clicked "Upload Bezels"
    PickBezels,
    /// Background read of bezel files completed
    BezelFilesRead(Vec<(String, Vec<u8>)>),
    ProfileSelected(StoreProfile),
    GroupSelected(&'static str),
    BezelToggled(bool),
    PadToggled(bool),
    UseAssetToggled(bool),
    AutoRotateToggled(bool),
    ComposeModeSelected(ComposeMode),
    /// User clicked "Generate"
    Generate,
    /// Background batch render completed
    BatchFinished(BatchOutcome),
    /// User clicked "Export All"
    ExportAll,
    /// Background export completed: number written, or first failure
    ExportFinished(Result<usize, String>),
    EditorPresetSelected(&'static OutputPreset),
    /// The editor canvas produced an updated margin record mid-drag
    MarginEdited(MarginRecord),
    ResetMargins,
    BakeBezel,
    ExportMarginsJson,
    ImportMarginsJson,
}

impl BezelStudio {
    /// Create a new instance of the application
    fn new() -> (Self, Task<Message>) {
        let editor_preset = catalog::find_by_id("10-land")
            .expect("preset catalog is missing the default editor target");

        println!(
            "🖼️  Bezel Studio initialized with {} presets",
            catalog::CATALOG.len()
        );

        (
            BezelStudio {
                session: Session::new(),
                screenshots: Vec::new(),
                options: PresentationOptions {
                    bezel_enabled: true,
                    pad_background: true,
                    use_bezel_asset: true,
                    auto_rotate: true,
                    compose_mode: ComposeMode::default(),
                },
                profile: StoreProfile::Play,
                group: "gp",
                editor_preset,
                editor_asset_handle: None,
                artifacts: Vec::new(),
                previews: Vec::new(),
                status: "Ready. Add screenshots to begin.".to_string(),
                running: false,
            },
            Task::none(),
        )
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::PickScreenshots => {
                let files = FileDialog::new()
                    .set_title("Select Screenshots")
                    .add_filter("Images", &["png", "jpg", "jpeg", "webp", "bmp"])
                    .pick_files();

                if let Some(paths) = files {
                    self.screenshots = paths;
                    self.status = format!("{} screenshot(s) queued.", self.screenshots.len());
                }
                Task::none()
            }
            Message::ClearScreenshots => {
                self.screenshots.clear();
                self.artifacts.clear();
                self.previews.clear();
                self.status = "Cleared screenshots and results.".to_string();
                Task::none()
            }
            Message::PickBezels => {
                let files = FileDialog::new()
                    .set_title("Select Bezel Images")
                    .add_filter("Images", &["png", "jpg", "jpeg"])
                    .pick_files();

                if let Some(paths) = files {
                    self.status = format!("Reading {} bezel file(s)...", paths.len());
                    return Task::perform(read_files_async(paths), Message::BezelFilesRead);
                }
                Task::none()
            }
            Message::BezelFilesRead(files) => {
                let report = self.session.bezels.load_batch(&files);
                for rejected in &report.rejected {
                    eprintln!(
                        "⚠️  Bezel rejected: {} ({})",
                        rejected.filename, rejected.reason
                    );
                }
                self.status = if self.session.bezels.is_empty() {
                    format!(
                        "⚠️ No usable bezels in that batch ({} rejected).",
                        report.rejected.len()
                    )
                } else {
                    format!(
                        "✅ Bezels loaded: {} accepted, {} rejected.",
                        report.loaded.len(),
                        report.rejected.len()
                    )
                };
                self.refresh_editor_asset();
                Task::none()
            }
            Message::ProfileSelected(profile) => {
                self.profile = profile;
                if let Some(first) = catalog::groups(profile).into_iter().next() {
                    self.group = first;
                }
                Task::none()
            }
            Message::GroupSelected(group) => {
                self.group = group;
                Task::none()
            }
            Message::BezelToggled(on) => {
                self.options.bezel_enabled = on;
                Task::none()
            }
            Message::PadToggled(on) => {
                self.options.pad_background = on;
                Task::none()
            }
            Message::UseAssetToggled(on) => {
                self.options.use_bezel_asset = on;
                Task::none()
            }
            Message::AutoRotateToggled(on) => {
                self.options.auto_rotate = on;
                Task::none()
            }
            Message::ComposeModeSelected(mode) => {
                self.options.compose_mode = mode;
                Task::none()
            }
            Message::Generate => {
                if self.running {
                    return Task::none();
                }
                if self.screenshots.is_empty() {
                    self.status = "Add at least one screenshot first.".to_string();
                    return Task::none();
                }

                let selection = catalog::expand_selection(self.profile, self.group);
                self.running = true;
                self.artifacts.clear();
                self.previews.clear();
                self.status = format!(
                    "Rendering {} file(s) × {} preset(s)...",
                    self.screenshots.len(),
                    selection.len()
                );

                Task::perform(
                    run_batch_async(
                        self.screenshots.clone(),
                        selection,
                        self.options,
                        self.session.margins.clone(),
                        self.session.bezels.clone(),
                    ),
                    Message::BatchFinished,
                )
            }
            Message::BatchFinished(outcome) => {
                self.running = false;

                if let Some(error) = outcome.error {
                    self.status = format!("⚠️ Batch failed: {}", error);
                    return Task::none();
                }

                self.previews = outcome
                    .artifacts
                    .iter()
                    .map(|a| {
                        (
                            a.filename.clone(),
                            iced_image::Handle::from_bytes(a.bytes.clone()),
                        )
                    })
                    .collect();

                let mut status = format!("✅ Generated {} mockup(s).", outcome.artifacts.len());
                if !outcome.failed_files.is_empty() {
                    status.push_str(&format!(
                        " {} item(s) failed.",
                        outcome.failed_files.len()
                    ));
                }
                if !outcome.missing_bezels.is_empty() {
                    status.push_str(&format!(
                        " No bezel asset for: {}.",
                        outcome.missing_bezels.join(", ")
                    ));
                }
                self.status = status;
                self.artifacts = outcome.artifacts;
                Task::none()
            }
            Message::ExportAll => {
                if self.artifacts.is_empty() {
                    self.status = "Nothing to export yet. Generate a batch first.".to_string();
                    return Task::none();
                }

                if let Some(folder) = FileDialog::new()
                    .set_title("Select Output Folder")
                    .pick_folder()
                {
                    self.status = format!("Exporting to {}...", folder.display());
                    return Task::perform(
                        export_artifacts_async(folder, self.artifacts.clone()),
                        Message::ExportFinished,
                    );
                }
                Task::none()
            }
            Message::ExportFinished(result) => {
                self.status = match result {
                    Ok(written) => format!("✅ Exported {} file(s).", written),
                    Err(e) => format!("⚠️ Export failed: {}", e),
                };
                Task::none()
            }
            Message::EditorPresetSelected(preset) => {
                self.editor_preset = preset;
                self.refresh_editor_asset();
                Task::none()
            }
            Message::MarginEdited(record) => {
                self.session.margins.set(self.editor_preset, record);
                Task::none()
            }
            Message::ResetMargins => {
                self.session.margins.reset(self.editor_preset.id);
                self.status = format!("Margins for {} reset to default.", self.editor_preset.id);
                Task::none()
            }
            Message::BakeBezel => {
                if self.session.bezels.bake_to_preset(self.editor_preset) {
                    self.status = format!(
                        "✅ Bezel baked to {}×{}.",
                        self.editor_preset.width, self.editor_preset.height
                    );
                    self.refresh_editor_asset();
                } else {
                    self.status = "No bezel asset uploaded for this preset.".to_string();
                }
                Task::none()
            }
            Message::ExportMarginsJson => {
                let file = FileDialog::new()
                    .set_title("Save Margin Records")
                    .set_file_name("margins.json")
                    .save_file();

                if let Some(path) = file {
                    self.status = match std::fs::write(&path, self.session.margins.export_json())
                    {
                        Ok(()) => format!("✅ Margins saved to {}.", path.display()),
                        Err(e) => format!("⚠️ Could not save margins: {}", e),
                    };
                }
                Task::none()
            }
            Message::ImportMarginsJson => {
                let file = FileDialog::new()
                    .set_title("Open Margin Records")
                    .add_filter("JSON", &["json"])
                    .pick_file();

                if let Some(path) = file {
                    let imported = std::fs::read_to_string(&path)
                        .map_err(error::Error::from)
                        .and_then(|text| self.session.margins.import_json(&text));
                    self.status = match imported {
                        Ok(summary) => format!(
                            "✅ Margins imported: {} applied, {} skipped.",
                            summary.applied, summary.skipped
                        ),
                        Err(e) => format!("⚠️ Margin import failed: {}", e),
                    };
                }
                Task::none()
            }
        }
    }

    /// Build the user interface
    fn view(&self) -> Element<Message> {
        let sources = row![
            button("Add Screenshots")
                .on_press(Message::PickScreenshots)
                .padding(10),
            button("Clear").on_press(Message::ClearScreenshots).padding(10),
            button("Upload Bezels").on_press(Message::PickBezels).padding(10),
            text(format!("{} screenshot(s) queued", self.screenshots.len())).size(16),
        ]
        .spacing(10)
        .align_y(Alignment::Center);

        let targets = row![
            text("Profile").size(16),
            pick_list(StoreProfile::ALL, Some(self.profile), Message::ProfileSelected),
            text("Group").size(16),
            pick_list(
                catalog::groups(self.profile),
                Some(self.group),
                Message::GroupSelected
            ),
        ]
        .spacing(10)
        .align_y(Alignment::Center);

        let presentation = row![
            checkbox("Bezel", self.options.bezel_enabled).on_toggle(Message::BezelToggled),
            checkbox("Pad background", self.options.pad_background)
                .on_toggle(Message::PadToggled),
            checkbox("Use bezel assets", self.options.use_bezel_asset)
                .on_toggle(Message::UseAssetToggled),
            checkbox("Auto-rotate", self.options.auto_rotate)
                .on_toggle(Message::AutoRotateToggled),
            pick_list(
                ComposeMode::ALL,
                Some(self.options.compose_mode),
                Message::ComposeModeSelected
            ),
        ]
        .spacing(15)
        .align_y(Alignment::Center);

        let generate: Element<Message> = if self.running {
            button("Rendering...").padding(10).into()
        } else {
            button("Generate").on_press(Message::Generate).padding(10).into()
        };
        let actions = row![
            generate,
            button("Export All").on_press(Message::ExportAll).padding(10),
            text(&self.status).size(16),
        ]
        .spacing(10)
        .align_y(Alignment::Center);

        let editor_controls = row![
            text("Margin editor").size(16),
            pick_list(
                catalog::CATALOG.iter().collect::<Vec<_>>(),
                Some(self.editor_preset),
                Message::EditorPresetSelected
            ),
            button("Reset").on_press(Message::ResetMargins),
            button("Bake").on_press(Message::BakeBezel),
            button("Export JSON").on_press(Message::ExportMarginsJson),
            button("Import JSON").on_press(Message::ImportMarginsJson),
        ]
        .spacing(10)
        .align_y(Alignment::Center);

        // the canvas draws the overlay; the bezel asset, when present, is
        // stacked underneath with the same letterbox fit
        let margins = self
            .session
            .margins
            .peek(self.editor_preset.id)
            .unwrap_or_else(|| {
                MarginRecord::default_for(self.editor_preset.width, self.editor_preset.height)
            });
        let canvas = Canvas::new(MarginEditor {
            preset_w: self.editor_preset.width,
            preset_h: self.editor_preset.height,
            margins,
            has_asset: self.editor_asset_handle.is_some(),
        })
        .width(Length::Fixed(EDITOR_W))
        .height(Length::Fixed(EDITOR_H));

        let editor_surface: Element<Message> = match &self.editor_asset_handle {
            Some(handle) => stack![
                iced_image::Image::new(handle.clone())
                    .width(Length::Fixed(EDITOR_W))
                    .height(Length::Fixed(EDITOR_H)),
                canvas,
            ]
            .into(),
            None => canvas.into(),
        };

        let cards: Vec<Element<Message>> = self
            .previews
            .iter()
            .map(|(name, handle)| {
                column![
                    iced_image::Image::new(handle.clone()).width(Length::Fixed(PREVIEW_W)),
                    text(name.clone()).size(12),
                ]
                .spacing(5)
                .into()
            })
            .collect();
        let previews = Wrap::with_elements(cards).spacing(10.0).line_spacing(10.0);

        let content = column![
            text("Bezel Studio").size(32),
            sources,
            targets,
            presentation,
            actions,
            editor_controls,
            editor_surface,
            previews,
        ]
        .spacing(20)
        .padding(40);

        container(scrollable(content))
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        Theme::Dark
    }

    /// Rebuild the cached editor asset handle for the current preset
    fn refresh_editor_asset(&mut self) {
        self.editor_asset_handle = self.session.bezels.get(self.editor_preset.id).map(|img| {
            iced_image::Handle::from_rgba(img.width(), img.height(), img.as_raw().clone())
        });
    }
}

fn main() -> iced::Result {
    iced::application("Bezel Studio", BezelStudio::update, BezelStudio::view)
        .theme(BezelStudio::theme)
        .centered()
        .run_with(BezelStudio::new)
}

/// Read a list of files into memory for the bezel registry.
/// Runs in a background thread to avoid blocking the UI.
async fn read_files_async(paths: Vec<PathBuf>) -> Vec<(String, Vec<u8>)> {
    let mut out = Vec::with_capacity(paths.len());
    for path in paths {
        let name = display_name(&path);
        match tokio::fs::read(&path).await {
            Ok(bytes) => out.push((name, bytes)),
            Err(e) => eprintln!("⚠️  Could not read {}: {}", name, e),
        }
    }
    out
}

/// Read the queued screenshots and run the full batch off the UI thread.
///
/// The batch runs on snapshots of the margin store and bezel registry;
/// defaults materialized during the run are recomputed on demand later.
async fn run_batch_async(
    paths: Vec<PathBuf>,
    selection: Vec<&'static OutputPreset>,
    options: PresentationOptions,
    mut margins: MarginStore,
    bezels: BezelRegistry,
) -> BatchOutcome {
    let mut files = Vec::with_capacity(paths.len());
    let mut failed: Vec<(String, String)> = Vec::new();
    for path in paths {
        let name = display_name(&path);
        match tokio::fs::read(&path).await {
            Ok(bytes) => files.push(SourceFile { name, bytes }),
            Err(e) => {
                eprintln!("⚠️  Could not read {}: {}", name, e);
                failed.push((name, e.to_string()));
            }
        }
    }

    let mut done = 0usize;
    let outcome = batch::run_batch(&files, &selection, &options, &mut margins, &bezels, |a| {
        done += 1;
        println!("⏳ Rendered {} ({} so far)", a.filename, done);
    });
    match outcome {
        Ok(report) => {
            failed.extend(report.failed_files);
            failed.extend(report.failed_pairs);
            BatchOutcome {
                artifacts: report.artifacts,
                failed_files: failed,
                missing_bezels: report.missing_bezels,
                error: None,
            }
        }
        Err(e) => BatchOutcome {
            artifacts: Vec::new(),
            failed_files: failed,
            missing_bezels: Vec::new(),
            error: Some(e.to_string()),
        },
    }
}

/// Write every artifact into the chosen folder
async fn export_artifacts_async(
    folder: PathBuf,
    artifacts: Vec<GeneratedArtifact>,
) -> Result<usize, String> {
    let mut written = 0;
    for artifact in &artifacts {
        let path = folder.join(&artifact.filename);
        tokio::fs::write(&path, &artifact.bytes)
            .await
            .map_err(|e| format!("{}: {}", artifact.filename, e))?;
        written += 1;
    }
    println!("✅ Exported {} file(s) to {}", written, folder.display());
    Ok(written)
}

/// Filename component of a path, for logs and registry keys
fn display_name(path: &PathBuf) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}
