use anyhow::{Context as AnyhowContext, Result};
use indicatif::{ProgressBar, ProgressStyle};
use kpm_model::Split;
use reqwest::Client;
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

pub const DEFAULT_BASE_URL: &str = "https://raw.githubusercontent.com/IBM/KPA_2021_shared_task/main";

#[derive(Debug, Serialize)]
pub struct DownloadReport {
    pub data_dir: String,
    pub base_url: String,
    pub downloaded: Vec<String>,
    pub skipped: Vec<String>,
}

/// One CSV file of the published dataset
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetFile {
    pub split: Split,
    pub name: String,
}

impl DatasetFile {
    /// Repository directory holding this split
    fn remote_dir(&self) -> &'static str {
        match self.split {
            Split::Train | Split::Dev => "kpm_data",
            Split::Test => "test_data",
        }
    }

    pub fn url(&self, base_url: &str) -> String {
        format!(
            "{}/{}/{}",
            base_url.trim_end_matches('/'),
            self.remote_dir(),
            self.name
        )
    }
}

/// All nine files of the train, dev and test splits
pub fn dataset_files() -> Vec<DatasetFile> {
    Split::ALL
        .into_iter()
        .flat_map(|split| {
            split
                .files()
                .into_iter()
                .map(move |name| DatasetFile { split, name })
        })
        .collect()
}

pub async fn download_dataset(
    data_dir: &Path,
    base_url: &str,
    force: bool,
    show_progress: bool,
) -> Result<DownloadReport> {
    std::fs::create_dir_all(data_dir)
        .with_context(|| format!("Failed to create directory {}", data_dir.display()))?;

    let client = Client::builder()
        .build()
        .context("Failed to build HTTP client")?;

    let mut downloaded = Vec::new();
    let mut skipped = Vec::new();

    for file in dataset_files() {
        let local_path = data_dir.join(&file.name);
        if local_path.exists() && !force {
            log::debug!("Skipping existing {}", local_path.display());
            skipped.push(file.name);
            continue;
        }

        let url = file.url(base_url);
        log::info!("Downloading {url}");
        let tmp_path = temp_path_for(&local_path);
        if let Err(err) = download_to(&client, &url, &tmp_path, &file.name, show_progress).await {
            std::fs::remove_file(&tmp_path).ok();
            return Err(err);
        }
        std::fs::rename(&tmp_path, &local_path).with_context(|| {
            format!(
                "Failed to move {} to {}",
                tmp_path.display(),
                local_path.display()
            )
        })?;
        downloaded.push(file.name);
    }

    Ok(DownloadReport {
        data_dir: data_dir.display().to_string(),
        base_url: base_url.to_string(),
        downloaded,
        skipped,
    })
}

async fn download_to(
    client: &Client,
    url: &str,
    dest: &Path,
    label: &str,
    show_progress: bool,
) -> Result<()> {
    let mut response = client
        .get(url)
        .send()
        .await
        .with_context(|| format!("Download failed: GET {url}"))?
        .error_for_status()
        .with_context(|| format!("Download failed: GET {url}"))?;

    let progress = if show_progress {
        progress_bar(response.content_length(), label)
    } else {
        ProgressBar::hidden()
    };

    let mut file = std::fs::File::create(dest)
        .with_context(|| format!("Failed to create {}", dest.display()))?;
    while let Some(chunk) = response
        .chunk()
        .await
        .with_context(|| format!("Failed while reading HTTP body from {url}"))?
    {
        file.write_all(&chunk)
            .with_context(|| format!("Failed to write {}", dest.display()))?;
        progress.inc(chunk.len() as u64);
    }
    file.flush()
        .with_context(|| format!("Failed to flush {}", dest.display()))?;
    progress.finish_and_clear();
    Ok(())
}

fn progress_bar(total: Option<u64>, label: &str) -> ProgressBar {
    let bar = match total {
        Some(len) => ProgressBar::new(len),
        None => ProgressBar::new_spinner(),
    };
    if let Ok(style) =
        ProgressStyle::with_template("{msg:24} [{bar:30}] {bytes}/{total_bytes} {bytes_per_sec}")
    {
        bar.set_style(style.progress_chars("=> "));
    }
    bar.set_message(label.to_string());
    bar
}

fn temp_path_for(path: &Path) -> PathBuf {
    let ts = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis();
    PathBuf::from(format!("{}.{}.download", path.display(), ts))
}
