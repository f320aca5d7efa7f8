//! Health check command - asks a running filedesk server for its status.

use std::time::Duration;

use serde::Deserialize;

use crate::cli::HealthArgs;

/// Body served by `GET /health`
#[derive(Debug, Deserialize)]
struct HealthReport {
    status: String,
    backend: String,
}

fn health_url(base: &str) -> String {
    let base = base.trim_end_matches('/');
    if base.ends_with("/health") {
        base.to_string()
    } else {
        format!("{base}/health")
    }
}

/// Run the health check command. Exits with status 1 when unhealthy.
pub async fn run(args: &HealthArgs) -> Result<(), Box<dyn std::error::Error>> {
    let url = health_url(&args.url);
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(args.timeout))
        .build()?;

    let response = match client.get(&url).send().await {
        Ok(response) => response,
        Err(e) => {
            eprintln!("unhealthy: failed to connect to {url}: {e}");
            std::process::exit(1);
        }
    };

    if !response.status().is_success() {
        eprintln!(
            "unhealthy: server returned HTTP status {}",
            response.status()
        );
        std::process::exit(1);
    }

    let report: HealthReport = response.json().await?;
    if report.status != "healthy" {
        eprintln!("unhealthy: server reported status {}", report.status);
        std::process::exit(1);
    }

    println!("healthy (backend: {})", report.backend);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_url_appends_path_once() {
        let expected = "http://localhost:3000/health";
        assert_eq!(health_url("http://localhost:3000"), expected);
        assert_eq!(health_url("http://localhost:3000/"), expected);
        assert_eq!(health_url(expected), expected);
    }
}
