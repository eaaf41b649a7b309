//! HTML output format for benchmark reports
//!
//! Styled tables with embedded CSS; monitoring columns are highlighted.

use crate::report::{metric_label, metric_legend, BenchmarkReport, RunCells};

/// HTML output formatter
#[derive(Debug)]
pub struct HtmlOutput<'a> {
    report: &'a BenchmarkReport,
}

impl<'a> HtmlOutput<'a> {
    pub fn new(report: &'a BenchmarkReport) -> Self {
        Self { report }
    }

    /// Escape HTML special characters to prevent XSS
    pub(crate) fn escape_html(text: &str) -> String {
        text.replace('&', "&amp;")
            .replace('<', "&lt;")
            .replace('>', "&gt;")
            .replace('"', "&quot;")
            .replace('\'', "&#39;")
    }

    /// Generate embedded CSS styles
    fn generate_styles() -> &'static str {
        r#"
        body {
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
            margin: 20px;
            background-color: #f5f5f5;
        }
        h1, h2, h3 {
            color: #333;
        }
        .header {
            background-color: #f0f0f0;
            padding: 20px;
            border-radius: 5px;
        }
        table {
            border-collapse: collapse;
            width: 100%;
            background-color: white;
            box-shadow: 0 1px 3px rgba(0,0,0,0.1);
            margin-bottom: 20px;
        }
        th, td {
            border: 1px solid #ddd;
            padding: 8px;
            text-align: center;
        }
        th {
            background-color: #4a90d9;
            color: white;
            font-weight: bold;
        }
        tr:nth-child(even) {
            background-color: #f9f9f9;
        }
        .scenario {
            background-color: #e6f3ff;
            font-weight: bold;
            font-family: monospace;
        }
        .monitor {
            background-color: #fff3cd;
        }
        .no-data {
            color: #999;
        }
        .time {
            font-size: 0.8em;
            color: #666;
        }
        .config-section {
            background-color: #e8f5e8;
            padding: 15px;
            border-radius: 5px;
        }
        pre {
            background-color: #f5f5f5;
            padding: 10px;
            border-radius: 3px;
            overflow-x: auto;
        }
        .footer {
            margin-top: 20px;
            font-size: 0.8em;
            color: #888;
            text-align: center;
        }
        "#
    }

    /// Generate the run table header row
    fn generate_header(&self) -> String {
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
        headers.extend(["Samples", "Match", "Run window"].iter().map(|h| h.to_string()));

        let header_cells: Vec<String> = headers
            .iter()
            .map(|h| format!("<th>{}</th>", Self::escape_html(h)))
            .collect();

        format!("<tr>{}</tr>", header_cells.join(""))
    }

    /// Format a run as an HTML table row
    fn format_run_row(&self, cells: &RunCells) -> String {
        let monitor = |text: &str| {
            let class = if text == crate::report::NO_DATA {
                "monitor no-data"
            } else {
                "monitor"
            };
            format!(r#"<td class="{}">{}</td>"#, class, Self::escape_html(text))
        };

        let mut row = vec![
            format!(
                r#"<td class="scenario">{}</td>"#,
                Self::escape_html(&cells.scenario)
            ),
            format!("<td>{}</td>", cells.threads),
            format!("<td>{}</td>", Self::escape_html(&cells.qps)),
            format!("<td>{}</td>", Self::escape_html(&cells.tps)),
            format!("<td>{}</td>", Self::escape_html(&cells.avg_latency)),
            format!("<td>{}</td>", Self::escape_html(&cells.p95_latency)),
        ];
        row.extend(cells.metrics.iter().map(|m| monitor(m)));
        row.push(monitor(&cells.sample_count));
        row.push(monitor(&cells.tier));
        row.push(format!(
            r#"<td class="time">{}</td>"#,
            Self::escape_html(&cells.time_range)
        ));

        format!("<tr>{}</tr>", row.join(""))
    }

    fn render_config_section(title: &str, content: &str) -> String {
        format!(
            "    <h2>{}</h2>\n    <div class=\"config-section\"><pre>{}</pre></div>\n",
            Self::escape_html(title),
            Self::escape_html(content)
        )
    }

    /// Legend mapping report columns to tsar columns
    fn render_legend(&self) -> String {
        let mut html = String::new();
        html.push_str("    <h3>Monitoring columns</h3>\n");
        html.push_str("    <table>\n");
        html.push_str("        <tr><th>Report column</th><th>tsar column</th><th>Meaning</th></tr>\n");
        for name in self.report.metric_order() {
            if let Some((column, meaning)) = metric_legend(name) {
                html.push_str(&format!(
                    "        <tr><td>{}</td><td>{}</td><td>{}</td></tr>\n",
                    Self::escape_html(metric_label(name)),
                    Self::escape_html(column),
                    Self::escape_html(meaning)
                ));
            }
        }
        html.push_str("    </table>\n");
        html
    }

    /// Generate complete HTML document
    pub fn to_html(&self) -> String {
        let report = self.report;
        let generated = report.generated_at.format("%Y-%m-%d %H:%M:%S").to_string();
        let mut html = String::new();

        html.push_str("<!DOCTYPE html>\n");
        html.push_str("<html lang=\"en\">\n");

        html.push_str("<head>\n");
        html.push_str("    <meta charset=\"UTF-8\">\n");
        html.push_str(
            "    <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n",
        );
        html.push_str("    <title>Benchmark Performance Report</title>\n");
        html.push_str("    <style>");
        html.push_str(Self::generate_styles());
        html.push_str("</style>\n");
        html.push_str("</head>\n");

        html.push_str("<body>\n");
        html.push_str("    <div class=\"header\">\n");
        html.push_str("        <h1>Benchmark Performance Report</h1>\n");
        html.push_str(&format!("        <p>Generated: {}</p>\n", generated));
        html.push_str("        <p>Tools: sysbench + tsar (matched by run window)</p>\n");
        html.push_str(&format!(
            "        <p>Monitoring samples: {} (metric set: {})</p>\n",
            report.sample_total,
            Self::escape_html(&report.schema.name)
        ));
        html.push_str("    </div>\n");

        html.push_str(&Self::render_config_section("Test configuration", &report.test_config));
        html.push_str(&Self::render_config_section("MySQL variables", &report.mysql_config));
        html.push_str(&Self::render_config_section("Server configuration", &report.server_config));

        html.push_str("    <h2>Results with CPU/IO monitoring</h2>\n");
        html.push_str("    <table>\n");
        html.push_str("        ");
        html.push_str(&self.generate_header());
        html.push('\n');

        let order = report.metric_order();
        for run in &report.runs {
            html.push_str("        ");
            html.push_str(&self.format_run_row(&RunCells::new(run, &order)));
            html.push('\n');
        }
        html.push_str("    </table>\n");

        html.push_str(&self.render_legend());

        html.push_str("    <div class=\"footer\">\n");
        html.push_str("        Generated by benchmon\n");
        html.push_str("    </div>\n");

        html.push_str("</body>\n");
        html.push_str("</html>\n");

        html
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::test_support::{report, run};

    #[test]
    fn test_html_escape() {
        assert_eq!(HtmlOutput::escape_html("<script>"), "&lt;script&gt;");
        assert_eq!(HtmlOutput::escape_html("a&b"), "a&amp;b");
        assert_eq!(HtmlOutput::escape_html("\"test\""), "&quot;test&quot;");
        assert_eq!(HtmlOutput::escape_html("'test'"), "&#39;test&#39;");
    }

    #[test]
    fn test_html_output_basic_structure() {
        let report = report(vec![]);
        let html = HtmlOutput::new(&report).to_html();

        assert!(html.contains("<!DOCTYPE html>"));
        assert!(html.contains("<html"));
        assert!(html.contains("</html>"));
        assert!(html.contains("<head>"));
        assert!(html.contains("<body>"));
        assert!(html.contains("<style>"));
        assert!(html.contains("<table"));
        assert!(html.contains("Monitoring samples: 3600"));
    }

    #[test]
    fn test_html_output_run_row() {
        let report = report(vec![run("oltp_point_select", 16, true)]);
        let html = HtmlOutput::new(&report).to_html();

        assert!(html.contains(r#"<td class="scenario">oltp_point_select</td>"#));
        assert!(html.contains("<td>93,399</td>"));
        assert!(html.contains(r#"<td class="monitor">55.5</td>"#));
        assert!(html.contains(r#"<td class="monitor">31</td>"#));
        assert!(html.contains("2025-11-22 15:33:10 ~ 2025-11-22 15:33:50"));
    }

    #[test]
    fn test_html_output_no_data_marked() {
        let report = report(vec![run("oltp_write_only", 8, false)]);
        let html = HtmlOutput::new(&report).to_html();

        assert!(html.contains(r#"<td class="monitor no-data">N/A</td>"#));
    }

    #[test]
    fn test_html_output_escapes_config_text() {
        let mut report = report(vec![]);
        report.server_config = "<script>alert('xss')</script>".to_string();
        let html = HtmlOutput::new(&report).to_html();

        assert!(!html.contains("<script>alert"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_html_output_header_columns() {
        let report = report(vec![]);
        let header = HtmlOutput::new(&report).generate_header();

        assert!(header.contains("Scenario"));
        assert!(header.contains("P95 latency (ms)"));
        assert!(header.contains("CPU util (%)"));
        assert!(header.contains("IO util (%)"));
        assert!(header.contains("Samples"));
    }

    #[test]
    fn test_html_output_legend_follows_schema() {
        let report = report(vec![]);
        let html = HtmlOutput::new(&report).to_html();

        assert!(html.contains("Overall CPU utilization"));
        assert!(!html.contains("soft interrupts"));
    }
}
