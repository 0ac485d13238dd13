//! Text renderer adapter: Implementation of ReportRenderer.
//!
//! Stands in for the external document renderer: it lays the fully-resolved
//! `ReportContent` out as a plain-text artifact. Content resolution (status
//! labels, recommendation text) happens upstream; this module only formats
//! and writes.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use crate::domain::report::ReportContent;
use crate::ports::ReportRenderer;

/// Error type for rendering operations.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("IO error writing report: {0}")]
    Io(#[from] std::io::Error),
}

/// Plain-text report renderer writing into a target directory.
pub struct TextReportRenderer {
    out_dir: PathBuf,
}

impl TextReportRenderer {
    /// Create a renderer that writes artifacts under `out_dir`.
    #[must_use]
    pub fn new<P: AsRef<Path>>(out_dir: P) -> Self {
        Self {
            out_dir: out_dir.as_ref().to_path_buf(),
        }
    }

    /// Deterministic artifact name for a report.
    #[must_use]
    pub fn filename(content: &ReportContent) -> String {
        let patient = content
            .patient_id
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' })
            .collect::<String>();
        format!(
            "maternal_risk_report_{}_{}.txt",
            patient,
            content.generated_at.format("%Y%m%d_%H%M%S")
        )
    }

    fn format(content: &ReportContent) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "MATERNAL RISK ASSESSMENT REPORT");
        let _ = writeln!(out, "Generated: {}", content.generated_at.format("%Y-%m-%d %H:%M:%S"));
        let _ = writeln!(out);
        let _ = writeln!(out, "Patient ID:    {}", content.patient_id);
        let _ = writeln!(out, "Health worker: {}", content.health_worker);
        let _ = writeln!(out, "Age:           {}", content.age);
        let _ = writeln!(out);
        let _ = writeln!(out, "RISK LEVEL: {}", content.risk_level);
        let _ = writeln!(out, "{}", content.risk_description);
        let _ = writeln!(out, "Confidence: {:.1}%", content.confidence);
        let _ = writeln!(
            out,
            "Probabilities: Low {:.1}% / Moderate {:.1}% / High {:.1}%",
            content.probabilities.low, content.probabilities.moderate, content.probabilities.high
        );
        let _ = writeln!(out, "Model: {}", content.model_used);
        let _ = writeln!(out);
        let _ = writeln!(out, "MEASUREMENTS");
        for line in &content.measurements {
            let _ = writeln!(out, "  {:<16} {:<12} {}", line.name, line.value, line.status);
        }
        let _ = writeln!(out);
        let _ = writeln!(out, "RECOMMENDATIONS");
        for (i, rec) in content.recommendations.iter().enumerate() {
            let _ = writeln!(out, "  {}. {}", i + 1, rec);
        }
        out
    }
}

impl ReportRenderer for TextReportRenderer {
    type Error = RenderError;

    fn render(&self, content: &ReportContent) -> Result<PathBuf, Self::Error> {
        std::fs::create_dir_all(&self.out_dir)?;

        let path = self.out_dir.join(Self::filename(content));
        std::fs::write(&path, Self::format(content))?;

        tracing::info!("Rendered report to {:?}", path);
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::report::ReportLine;
    use crate::domain::{ClassProbabilities, RiskLevel};
    use chrono::NaiveDateTime;
    use tempfile::tempdir;

    fn sample_content() -> ReportContent {
        ReportContent {
            generated_at: NaiveDateTime::parse_from_str(
                "2025-03-14 10:30:00",
                "%Y-%m-%d %H:%M:%S",
            )
            .expect("Valid timestamp"),
            patient_id: "P-2025-0007".to_string(),
            health_worker: "Amina".to_string(),
            age: 31,
            risk_level: RiskLevel::High,
            risk_description: RiskLevel::High.description(),
            confidence: 87.5,
            probabilities: ClassProbabilities {
                low: 4.0,
                moderate: 8.5,
                high: 87.5,
            },
            model_used: "Full Model (5 features)".to_string(),
            measurements: vec![ReportLine {
                name: "BMI",
                value: "31.2 kg/m²".to_string(),
                status: "Obese",
            }],
            recommendations: vec!["Refer within 24 hours.".to_string()],
        }
    }

    #[test]
    fn test_filename_is_deterministic_and_safe() {
        let mut content = sample_content();
        content.patient_id = "N/A".to_string();
        let name = TextReportRenderer::filename(&content);
        assert_eq!(name, "maternal_risk_report_N_A_20250314_103000.txt");
    }

    #[test]
    fn test_render_writes_resolved_content() {
        let dir = tempdir().expect("Should create tempdir");
        let renderer = TextReportRenderer::new(dir.path());

        let path = renderer.render(&sample_content()).expect("Should render");
        let text = std::fs::read_to_string(&path).expect("Should read");

        assert!(text.contains("RISK LEVEL: High"));
        assert!(text.contains("Obese"));
        assert!(text.contains("Refer within 24 hours."));
    }
}
