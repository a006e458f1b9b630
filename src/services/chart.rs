/// What a renderer hands back for delivery: either an image for
/// `sendPhoto` or preformatted text for a plain message.
#[derive(Debug, Clone)]
pub enum ChartArtifact {
    Photo { bytes: Vec<u8>, caption: String },
    Text(String),
}

/// Seam for the distribution chart. Rasterization is a collaborator
/// concern; the bot only computes the counts and delivers whatever the
/// renderer produces.
pub trait ChartRenderer: Send + Sync {
    fn render(&self, title: &str, counts: &[(String, usize)]) -> ChartArtifact;
}

/// Unicode bar chart. No image stack needed, reads fine in a chat.
pub struct TextChart;

const BAR_WIDTH: usize = 18;

impl ChartRenderer for TextChart {
    fn render(&self, title: &str, counts: &[(String, usize)]) -> ChartArtifact {
        let max = counts.iter().map(|(_, n)| *n).max().unwrap_or(1).max(1);

        let mut lines = vec![format!("📊 *{title}*\n")];
        for (label, count) in counts {
            let filled = (count * BAR_WIDTH).div_ceil(max).min(BAR_WIDTH);
            let bar: String = "▰".repeat(filled.max(1));
            lines.push(format!("`{bar}` {count} — {label}"));
        }
        ChartArtifact::Text(lines.join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bars_scale_to_the_largest_group() {
        let counts = vec![("Fizika".to_string(), 90), ("Kimyo".to_string(), 9)];
        let artifact = TextChart.render("Taqsimot", &counts);
        let text = match artifact {
            ChartArtifact::Text(t) => t,
            _ => panic!("text chart renders text"),
        };
        let lines: Vec<&str> = text.lines().collect();
        assert!(lines[0].contains("Taqsimot"));
        assert!(lines[2].contains("90"));
        let big_bar = lines[2].matches('▰').count();
        let small_bar = lines[3].matches('▰').count();
        assert!(big_bar > small_bar);
        assert!(small_bar >= 1);
    }
}
