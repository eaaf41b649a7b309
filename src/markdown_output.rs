//! Markdown output format for benchmark reports

use crate::report::{metric_label, metric_legend, BenchmarkReport, RunCells};

/// Markdown output formatter
#[derive(Debug)]
pub struct MarkdownOutput<'a> {
    report: &'a BenchmarkReport,
    include_samples: bool,
}

impl<'a> MarkdownOutput<'a> {
    pub fn new(report: &'a BenchmarkReport) -> Self {
        Self {
            report,
            include_samples: true,
        }
    }

    /// Drop the sample-count and match columns (used for merged reports)
    pub fn without_sample_columns(mut self) -> Self {
        self.include_samples = false;
        self
    }

    /// Escape characters that would break a table cell
    fn escape_cell(text: &str) -> String {
        text.replace('|', "\\|").replace('\n', " ")
    }

    fn header(&self) -> Vec<String> {
        let mut headers: Vec<String> = [
            "Scenario",
            "Threads",
            "QPS",
            "TPS",
            "Avg latency (ms)",
            "P95 latency (ms)",
        ]
        .iter()
        .map(|h| h.to_string())
        .collect();

        headers.extend(
            self.report
                .metric_order()
                .iter()
                .map(|m| metric_label(m).to_string()),
        );
        if self.include_samples {
            headers.push("Samples".to_string());
            headers.push("Match".to_string());
        }
        headers.push("Run window".to_string());
        headers
    }

    fn row(&self, cells: &RunCells) -> Vec<String> {
        let mut row = vec![
            cells.scenario.clone(),
            cells.threads.clone(),
            cells.qps.clone(),
            cells.tps.clone(),
            cells.avg_latency.clone(),
            cells.p95_latency.clone(),
        ];
        row.extend(cells.metrics.iter().cloned());
        if self.include_samples {
            row.push(cells.sample_count.clone());
            row.push(cells.tier.clone());
        }
        row.push(cells.time_range.clone());
        row
    }

    fn table_line(cells: &[String]) -> String {
        let escaped: Vec<String> = cells.iter().map(|c| Self::escape_cell(c)).collect();
        format!("| {} |\n", escaped.join(" | "))
    }

    /// The run table alone, header included
    pub fn results_table(&self) -> String {
        let header = self.header();
        let mut md = Self::table_line(&header);
        md.push_str(&format!("|{}\n", "---|".repeat(header.len())));

        let order = self.report.metric_order();
        for run in &self.report.runs {
            md.push_str(&Self::table_line(&self.row(&RunCells::new(run, &order))));
        }
        md
    }

    fn code_block(title: &str, content: &str) -> String {
        format!("## {}\n\n```\n{}\n```\n\n", title, content.trim_end())
    }

    fn legend(&self) -> String {
        let mut md = String::from("### Monitoring columns\n\n");
        md.push_str("| Report column | tsar column | Meaning |\n|---|---|---|\n");
        for name in self.report.metric_order() {
            if let Some((column, meaning)) = metric_legend(name) {
                md.push_str(&format!("| {} | {} | {} |\n", metric_label(name), column, meaning));
            }
        }
        md
    }

    /// Generate the complete Markdown document
    pub fn to_markdown(&self) -> String {
        let report = self.report;
        let generated = report.generated_at.format("%Y-%m-%d %H:%M:%S");

        let mut md = String::from("# Benchmark Performance Report\n\n");
        md.push_str(&format!("**Generated**: {}  \n", generated));
        md.push_str("**Tools**: sysbench + tsar (matched by run window)  \n");
        md.push_str(&format!(
            "**Monitoring samples**: {} (metric set: {})  \n\n",
            report.sample_total, report.schema.name
        ));

        md.push_str(&Self::code_block("Test configuration", &report.test_config));
        md.push_str(&Self::code_block("MySQL variables", &report.mysql_config));
        md.push_str(&Self::code_block("Server configuration", &report.server_config));

        md.push_str("## Results with CPU/IO monitoring\n\n");
        md.push_str(&self.results_table());
        md.push('\n');
        md.push_str(&self.legend());

        md.push_str("\n## Notes\n\n");
        md.push_str("- CPU/IO values are means of the tsar samples taken during each run window.\n");
        md.push_str("- Samples counts how many monitoring points contributed to a row.\n");
        md.push_str(
            "- Match shows how the window was found: exact-window (+/- tight pad), \
             time-of-day (dates ignored) or wide-window (+/- wide pad).\n",
        );
        md.push_str("- N/A means no monitoring data could be attributed to the run.\n");

        md
    }
}
