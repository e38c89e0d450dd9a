use super::CliError;
use anyhow::Context;
use histo_core::document::{load_workspace, save_workspace};
use histo_core::domain::{HistoError, YMode};
use histo_core::workspace::Workspace1D;
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(clap::Args)]
pub(super) struct InspectArgs {
    /// Workspace document to read
    file: PathBuf,
}

#[derive(clap::Args)]
pub(super) struct MaskArgs {
    /// Workspace document to read
    file: PathBuf,

    /// Index of the bin to mask
    #[arg(long = "bin")]
    bin_index: usize,

    /// Masking weight in [0, 1]
    #[arg(long, allow_negative_numbers = true)]
    weight: f64,

    #[command(flatten)]
    output: OutputFlags,
}

#[derive(clap::Args)]
pub(super) struct ClearArgs {
    /// Workspace document to read
    file: PathBuf,

    #[command(flatten)]
    output: OutputFlags,
}

#[derive(clap::Args)]
pub(super) struct ConvertArgs {
    /// Workspace document to read
    file: PathBuf,

    /// Target Y mode (counts or frequencies)
    #[arg(long = "to")]
    target: YMode,

    #[command(flatten)]
    output: OutputFlags,
}

#[derive(clap::Args)]
struct OutputFlags {
    /// Where to write the result; defaults to rewriting the input
    #[arg(long)]
    output: Option<PathBuf>,
}

impl OutputFlags {
    fn resolve(self, input: &Path) -> PathBuf {
        self.output.unwrap_or_else(|| input.to_path_buf())
    }
}

#[derive(Debug, Clone)]
pub(super) struct InspectRequest {
    input: PathBuf,
}

#[derive(Debug, Clone)]
pub(super) struct MaskRequest {
    input: PathBuf,
    output: PathBuf,
    bin_index: usize,
    weight: f64,
}

#[derive(Debug, Clone)]
pub(super) struct ClearRequest {
    input: PathBuf,
    output: PathBuf,
}

#[derive(Debug, Clone)]
pub(super) struct ConvertRequest {
    input: PathBuf,
    output: PathBuf,
    target: YMode,
}

impl InspectArgs {
    pub(super) fn into_request(self) -> InspectRequest {
        InspectRequest { input: self.file }
    }
}

impl MaskArgs {
    pub(super) fn into_request(self) -> MaskRequest {
        MaskRequest {
            output: self.output.resolve(&self.file),
            input: self.file,
            bin_index: self.bin_index,
            weight: self.weight,
        }
    }
}

impl ClearArgs {
    pub(super) fn into_request(self) -> ClearRequest {
        ClearRequest {
            output: self.output.resolve(&self.file),
            input: self.file,
        }
    }
}

impl ConvertArgs {
    pub(super) fn into_request(self) -> ConvertRequest {
        ConvertRequest {
            output: self.output.resolve(&self.file),
            input: self.file,
            target: self.target,
        }
    }
}

pub(super) fn run_inspect_command(request: InspectRequest) -> Result<i32, CliError> {
    let workspace = load(&request.input)?;
    let histogram = workspace.histogram()?;
    let info = workspace.spectrum().info();
    let detector_ids = info
        .detector_ids()
        .iter()
        .map(i32::to_string)
        .collect::<Vec<_>>()
        .join(", ");

    let mut stdout = std::io::stdout().lock();
    let report = format!(
        "Title: {}\nSpectrum number: {}\nDetector IDs: [{}]\nX mode: {}\nY mode: {}\nSize: {}\nBlocksize: {}\n",
        workspace.title(),
        info.spectrum_number(),
        detector_ids,
        histogram.x_mode(),
        histogram.y_mode(),
        workspace.size(),
        workspace.blocksize(),
    );
    stdout
        .write_all(report.as_bytes())
        .context("failed to write inspect report to stdout")?;
    Ok(0)
}

pub(super) fn run_mask_command(request: MaskRequest) -> Result<i32, CliError> {
    let mut workspace = load(&request.input)?;
    workspace
        .spectrum_mut()
        .apply_bin_weight(request.bin_index, request.weight)?;
    tracing::info!(
        bin_index = request.bin_index,
        weight = request.weight,
        "masked bin"
    );
    save(&request.output, &workspace)?;
    println!(
        "Masked bin {} with weight {} -> {}",
        request.bin_index,
        request.weight,
        request.output.display()
    );
    Ok(0)
}

pub(super) fn run_clear_command(request: ClearRequest) -> Result<i32, CliError> {
    let mut workspace = load(&request.input)?;
    workspace.spectrum_mut().clear_data();
    save(&request.output, &workspace)?;
    println!(
        "Cleared {} bins -> {}",
        workspace.size(),
        request.output.display()
    );
    Ok(0)
}

pub(super) fn run_convert_command(request: ConvertRequest) -> Result<i32, CliError> {
    let mut workspace = load(&request.input)?;
    let histogram = workspace.histogram()?;
    let converted = match request.target {
        YMode::Counts => histogram.to_counts()?,
        YMode::Frequencies => histogram.to_frequencies()?,
        YMode::Uninitialized => {
            return Err(CliError::Usage(
                "conversion target must be counts or frequencies".to_string(),
            ));
        }
    };

    let spectrum = workspace.spectrum_mut().as_histogram_mut().ok_or_else(|| {
        HistoError::logic(
            "CLI.EVENT_SPECTRUM",
            "event spectra cannot be converted in place",
        )
    })?;
    spectrum.set_histogram(converted)?;
    tracing::info!(from = %histogram.y_mode(), to = %request.target, "converted Y mode");

    save(&request.output, &workspace)?;
    println!(
        "Converted {} to {} -> {}",
        histogram.y_mode(),
        request.target,
        request.output.display()
    );
    Ok(0)
}

fn load(path: &Path) -> Result<Workspace1D, CliError> {
    let workspace = load_workspace(path)?;
    tracing::info!(path = %path.display(), size = workspace.size(), "loaded workspace");
    Ok(workspace)
}

fn save(path: &Path, workspace: &Workspace1D) -> Result<(), CliError> {
    save_workspace(path, workspace)?;
    tracing::info!(path = %path.display(), "saved workspace");
    Ok(())
}
