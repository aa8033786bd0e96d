//! Headless Verbalit driver.
//!
//! Replays a JSON script of toolbar actions and pointer events on a fresh
//! surface and prints the resulting document.
//!
//! ```text
//! verbalit <script.json> [config.json]
//! ```
//!
//! A script is an array of steps:
//! ```json
//! [
//!   { "action": "choose_shape", "shape": "circle" },
//!   { "type": "down", "position": { "x": 640.0, "y": 400.0 } },
//!   { "viewport": { "width": 1024.0, "height": 768.0 } },
//!   { "image": "photo.png", "width": 800, "height": 600 }
//! ]
//! ```

use clap::Parser;
use kurbo::Size;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use thiserror::Error;
use verbalit_core::{Canvas, PointerEvent, SurfaceConfig, SurfaceError, ToolAction};

const DEFAULT_VIEWPORT: Size = Size::new(1280.0, 800.0);

#[derive(Parser, Debug)]
#[command(name = "verbalit", about = "Replay a moodboard script and print the document")]
struct Cli {
    /// JSON array of script steps.
    script: PathBuf,

    /// Surface config; missing fields use defaults.
    config: Option<PathBuf>,
}

#[derive(Debug, Error)]
enum DriverError {
    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid JSON in {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("Step {index} failed: {source}")]
    Step { index: usize, source: SurfaceError },
    #[error(transparent)]
    Output(#[from] serde_json::Error),
}

/// One scripted input.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
enum ScriptStep {
    Action(ToolAction),
    Pointer(PointerEvent),
    Viewport { viewport: Size },
    Image {
        image: PathBuf,
        width: u32,
        height: u32,
    },
}

fn read(path: &Path) -> Result<String, DriverError> {
    std::fs::read_to_string(path).map_err(|source| DriverError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn parse<T: serde::de::DeserializeOwned>(path: &Path, json: &str) -> Result<T, DriverError> {
    serde_json::from_str(json).map_err(|source| DriverError::Json {
        path: path.to_path_buf(),
        source,
    })
}

fn replay(canvas: &mut Canvas, steps: Vec<ScriptStep>) -> Result<(), DriverError> {
    for (index, step) in steps.into_iter().enumerate() {
        log::debug!("step {}: {:?}", index, step);
        let result = match step {
            ScriptStep::Action(action) => canvas.handle_action(action),
            ScriptStep::Pointer(event) => canvas.handle_pointer(event),
            ScriptStep::Viewport { viewport } => {
                canvas.camera.set_viewport(viewport);
                Ok(())
            }
            ScriptStep::Image {
                image,
                width,
                height,
            } => {
                let data = read_bytes(&image)?;
                canvas.add_image(&data, width, height).map(|_| ())
            }
        };
        result.map_err(|source| DriverError::Step { index, source })?;
    }
    Ok(())
}

fn read_bytes(path: &Path) -> Result<Vec<u8>, DriverError> {
    std::fs::read(path).map_err(|source| DriverError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn run(cli: Cli) -> Result<(), DriverError> {
    let config = match &cli.config {
        Some(path) => parse::<SurfaceConfig>(path, &read(path)?)?,
        None => SurfaceConfig::default(),
    };

    let steps: Vec<ScriptStep> = parse(&cli.script, &read(&cli.script)?)?;
    log::info!("replaying {} steps from {}", steps.len(), cli.script.display());

    let mut canvas = Canvas::with_config(config, DEFAULT_VIEWPORT);
    replay(&mut canvas, steps)?;

    log::info!(
        "done: {} objects, {} snapshots, {} connectors",
        canvas.document.len(),
        canvas.history().len(),
        canvas.connectors().len()
    );
    println!("{}", canvas.document.to_json()?);
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{}", err);
            eprintln!("{}", err);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Point;
    use verbalit_core::ShapeChoice;

    #[test]
    fn test_parse_mixed_script() {
        let json = r#"[
            { "action": "choose_shape", "shape": "square" },
            { "type": "move", "position": { "x": 1.0, "y": 2.0 } },
            { "viewport": { "width": 640.0, "height": 480.0 } }
        ]"#;
        let steps: Vec<ScriptStep> = serde_json::from_str(json).unwrap();
        assert_eq!(
            steps,
            vec![
                ScriptStep::Action(ToolAction::ChooseShape {
                    shape: ShapeChoice::Square
                }),
                ScriptStep::Pointer(PointerEvent::Move {
                    position: Point::new(1.0, 2.0)
                }),
                ScriptStep::Viewport {
                    viewport: Size::new(640.0, 480.0)
                },
            ]
        );
    }

    #[test]
    fn test_replay_with_undo_redo() {
        let steps: Vec<ScriptStep> = serde_json::from_str(
            r#"[
                { "action": "choose_shape", "shape": "rectangle" },
                { "action": "add_note" },
                { "action": "undo" },
                { "action": "redo" }
            ]"#,
        )
        .unwrap();
        let mut canvas = Canvas::with_config(SurfaceConfig::default(), DEFAULT_VIEWPORT);
        replay(&mut canvas, steps).unwrap();
        assert_eq!(canvas.document.len(), 2);
        assert_eq!(canvas.history().len(), 3);
    }

    #[test]
    fn test_failed_step_reports_index() {
        let steps = vec![ScriptStep::Action(ToolAction::SelectObject {
            id: Some(uuid_like()),
        })];
        let mut canvas = Canvas::new();
        let err = replay(&mut canvas, steps).unwrap_err();
        assert!(matches!(err, DriverError::Step { index: 0, .. }));
    }

    #[test]
    fn test_cli_args() {
        let cli = Cli::try_parse_from(["verbalit", "board.json"]).unwrap();
        assert_eq!(cli.script, PathBuf::from("board.json"));
        assert_eq!(cli.config, None);

        let cli = Cli::try_parse_from(["verbalit", "board.json", "surface.json"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("surface.json")));

        assert!(Cli::try_parse_from(["verbalit"]).is_err());
    }

    fn uuid_like() -> verbalit_core::shapes::ShapeId {
        serde_json::from_str(r#""67e55044-10b1-426f-9247-bb680e5fe0c8""#).unwrap()
    }
}
