//! Output formatters for analysis results

use crate::config::OutputFormat;
use crate::error::Result;
use crate::llm::analyzer::AnalysisResult;
use colored::{Color, Colorize};

/// Banding of a 0-100 score for visual indicators.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScoreBand {
    Excellent,
    Moderate,
    Weak,
}

impl ScoreBand {
    pub fn classify(score: i64) -> Self {
        match score {
            80..=100 => ScoreBand::Excellent,
            60..=79 => ScoreBand::Moderate,
            _ => ScoreBand::Weak,
        }
    }

    fn color(&self) -> Color {
        match self {
            ScoreBand::Excellent => Color::Green,
            ScoreBand::Moderate => Color::Yellow,
            ScoreBand::Weak => Color::Red,
        }
    }

    fn label(&self) -> &'static str {
        match self {
            ScoreBand::Excellent => "EXCELLENT",
            ScoreBand::Moderate => "MODERATE",
            ScoreBand::Weak => "WEAK",
        }
    }
}

/// Render a result in the requested format.
pub fn render(result: &AnalysisResult, format: &OutputFormat, use_colors: bool) -> Result<String> {
    match format {
        OutputFormat::Console => Ok(ConsoleFormatter::new(use_colors).format(result)),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(result)?),
        OutputFormat::Markdown => Ok(format_markdown(result)),
    }
}

pub struct ConsoleFormatter {
    use_colors: bool,
}

impl ConsoleFormatter {
    pub fn new(use_colors: bool) -> Self {
        Self { use_colors }
    }

    fn colorize(&self, text: &str, color: Color) -> String {
        if self.use_colors {
            text.color(color).bold().to_string()
        } else {
            text.to_string()
        }
    }

    fn score_line(&self, name: &str, score: i64) -> String {
        let band = ScoreBand::classify(score);
        format!(
            "  {:<12} {:>3}%  {}",
            name,
            score,
            self.colorize(&format!("[{}]", band.label()), band.color())
        )
    }

    pub fn format(&self, result: &AnalysisResult) -> String {
        let mut out = String::new();

        let overall_band = ScoreBand::classify(result.overall_average);
        out.push_str(&format!(
            "\nOverall Match: {}\n",
            self.colorize(
                &format!("{}%", result.overall_average),
                overall_band.color()
            )
        ));

        out.push_str("\nScores:\n");
        out.push_str(&self.score_line("Technical", result.technical_score));
        out.push('\n');
        out.push_str(&self.score_line("Experience", result.experience_score));
        out.push('\n');
        out.push_str(&self.score_line("Soft Skills", result.soft_skill_score));
        out.push('\n');

        if !result.missing_keywords.is_empty() {
            out.push_str(&format!(
                "\n{}\n",
                self.colorize("Missing Keywords:", Color::Red)
            ));
            for keyword in &result.missing_keywords {
                out.push_str(&format!("  - {}\n", keyword));
            }
        }

        out.push_str(&format!(
            "\n{}\n  {}\n",
            self.colorize("Summary:", Color::Blue),
            result.candidate_summary
        ));

        out.push_str(&format!(
            "\n{}\n  {}\n",
            self.colorize("Interview Question:", Color::Blue),
            result.interview_question
        ));

        out
    }
}

fn format_markdown(result: &AnalysisResult) -> String {
    let mut out = String::new();

    out.push_str("# CV Analysis Report\n\n");
    out.push_str(&format!("**Overall Match:** {}%\n\n", result.overall_average));

    out.push_str("## Scores\n\n");
    out.push_str("| Dimension | Score |\n|---|---|\n");
    out.push_str(&format!("| Technical | {}% |\n", result.technical_score));
    out.push_str(&format!("| Experience | {}% |\n", result.experience_score));
    out.push_str(&format!("| Soft Skills | {}% |\n", result.soft_skill_score));

    out.push_str("\n## Missing Keywords\n\n");
    if result.missing_keywords.is_empty() {
        out.push_str("None identified.\n");
    } else {
        for keyword in &result.missing_keywords {
            out.push_str(&format!("- {}\n", keyword));
        }
    }

    out.push_str(&format!("\n## Summary\n\n{}\n", result.candidate_summary));
    out.push_str(&format!(
        "\n## Interview Question\n\n{}\n",
        result.interview_question
    ));

    out
}
