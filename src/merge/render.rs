// Markdown rendering for the merged report

use super::EnvironmentReport;
use crate::markdown_output::MarkdownOutput;
use crate::report::{format_thousands, NO_DATA};
use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use std::fs;
use std::path::Path;
use tracing::info;

/// Scenarios compared across environments, in table order
pub const COMPARED_SCENARIOS: [&str; 4] = [
    "oltp_point_select",
    "oltp_write_only",
    "oltp_read_write",
    "oltp_read_only",
];

/// Thread counts shown in comparison tables
pub const COMPARED_THREADS: [u32; 6] = [1, 8, 16, 32, 64, 128];

const PEAK_THREADS: u32 = 128;
const MID_THREADS: u32 = 64;

/// Cell for a value missing from one environment
const MISSING: &str = "-";

fn scenario_title(scenario: &str) -> &str {
    match scenario {
        "oltp_point_select" => "Point select",
        "oltp_write_only" => "Write only",
        "oltp_read_write" => "Read/write",
        "oltp_read_only" => "Read only",
        other => other,
    }
}

#[derive(Debug, Clone)]
pub struct MergedReport {
    pub environments: Vec<EnvironmentReport>,
    pub generated_at: NaiveDateTime,
}

impl MergedReport {
    pub fn new(environments: Vec<EnvironmentReport>) -> Self {
        Self {
            environments,
            generated_at: chrono::Local::now().naive_local(),
        }
    }

    /// Environment with the highest QPS for `scenario` at `threads`
    ///
    /// Ties go to the environment listed first; `None` when no environment
    /// has a result for that run.
    pub fn best_environment(&self, scenario: &str, threads: u32) -> Option<&EnvironmentReport> {
        let mut best: Option<(&EnvironmentReport, f64)> = None;
        for env in &self.environments {
            let Some(qps) = env.qps(scenario, threads) else {
                continue;
            };
            if best.map_or(true, |(_, top)| qps > top) {
                best = Some((env, qps));
            }
        }
        best.map(|(env, _)| env)
    }

    fn thread_header() -> String {
        let mut md = String::from("| Environment |");
        for threads in COMPARED_THREADS {
            md.push_str(&format!(" {} threads |", threads));
        }
        md.push_str(&format!("\n|---|{}\n", "---|".repeat(COMPARED_THREADS.len())));
        md
    }

    fn thread_table(&self, value: impl Fn(&EnvironmentReport, u32) -> Option<String>) -> String {
        let mut md = Self::thread_header();
        for env in &self.environments {
            md.push_str(&format!("| **{}** |", env.name));
            for threads in COMPARED_THREADS {
                let cell = value(env, threads).unwrap_or_else(|| MISSING.to_string());
                md.push_str(&format!(" {} |", cell));
            }
            md.push('\n');
        }
        md.push('\n');
        md
    }

    fn overview(&self) -> String {
        let mut md = String::from("### Environments\n\n");
        md.push_str("| Environment | CPU model | Cores | Memory | Buffer pool | Flush log |\n");
        md.push_str("|---|---|---|---|---|---|\n");
        for env in &self.environments {
            let fact = |v: &Option<String>| v.clone().unwrap_or_else(|| NO_DATA.to_string());
            md.push_str(&format!(
                "| **{}** | {} | {} | {} | {} | {} |\n",
                env.name,
                fact(&env.facts.cpu_model),
                fact(&env.facts.cores),
                fact(&env.facts.memory),
                fact(&env.facts.buffer_pool),
                fact(&env.facts.flush_log),
            ));
        }
        md.push('\n');
        md
    }

    fn any_ran(&self, scenario: &str) -> bool {
        self.environments.iter().any(|e| e.has_scenario(scenario))
    }

    fn qps_section(&self) -> String {
        let mut md = String::from("## QPS comparison\n\n");
        for scenario in COMPARED_SCENARIOS {
            if !self.any_ran(scenario) {
                continue;
            }
            md.push_str(&format!("### {} ({})\n\n", scenario_title(scenario), scenario));
            md.push_str(&self.thread_table(|env, threads| {
                env.qps(scenario, threads).map(format_thousands)
            }));
        }
        md
    }

    fn latency_section(&self) -> String {
        let mut md = String::from("## P95 latency comparison (ms)\n\n");
        for scenario in ["oltp_point_select", "oltp_read_write"] {
            if !self.any_ran(scenario) {
                continue;
            }
            md.push_str(&format!("### {} ({})\n\n", scenario_title(scenario), scenario));
            md.push_str(&self.thread_table(|env, threads| {
                env.p95_latency(scenario, threads).map(|v| format!("{:.2}", v))
            }));
        }
        md
    }

    fn recommendation(&self) -> String {
        let best = |scenario: &str| {
            self.best_environment(scenario, PEAK_THREADS)
                .map(|env| format!("**{}**", env.name))
                .unwrap_or_else(|| NO_DATA.to_string())
        };

        let mut md = format!("## Best environment at {} threads\n\n", PEAK_THREADS);
        md.push_str(&format!(
            "- Query-heavy workloads (oltp_point_select): {}\n",
            best("oltp_point_select")
        ));
        md.push_str(&format!(
            "- Write-heavy workloads (oltp_write_only): {}\n\n",
            best("oltp_write_only")
        ));
        md
    }

    fn mid_load_section(&self) -> String {
        let mut md = format!("## {}-thread comparison (QPS)\n\n| Scenario |", MID_THREADS);
        for env in &self.environments {
            md.push_str(&format!(" {} |", env.name));
        }
        md.push_str(&format!("\n|---|{}\n", "---|".repeat(self.environments.len())));

        for scenario in COMPARED_SCENARIOS {
            md.push_str(&format!("| **{}** |", scenario_title(scenario)));
            for env in &self.environments {
                let cell = env
                    .qps(scenario, MID_THREADS)
                    .map(format_thousands)
                    .unwrap_or_else(|| MISSING.to_string());
                md.push_str(&format!(" {} |", cell));
            }
            md.push('\n');
        }
        md.push('\n');
        md
    }

    fn chapters(&self) -> String {
        let mut md = String::new();
        for (i, env) in self.environments.iter().enumerate() {
            md.push_str(&format!("# Chapter {}: {}\n\n", i + 1, env.name));
            md.push_str(&format!(
                "Monitoring samples: {} (metric set: {})\n\n",
                env.report.sample_total, env.report.schema.name
            ));
            if env.report.runs.is_empty() {
                md.push_str("No benchmark runs found.\n\n");
                continue;
            }
            md.push_str(
                &MarkdownOutput::new(&env.report)
                    .without_sample_columns()
                    .results_table(),
            );
            md.push('\n');
        }
        md
    }

    /// Generate the complete merged Markdown document
    pub fn to_markdown(&self) -> String {
        let mut md = String::from("# Benchmark Comparison Report\n\n");
        md.push_str(&format!(
            "**Generated**: {}  \n**Environments**: {}\n\n",
            self.generated_at.format("%Y-%m-%d %H:%M:%S"),
            self.environments.len()
        ));

        md.push_str(&self.overview());
        md.push_str("---\n\n");
        md.push_str(&self.qps_section());
        md.push_str(&self.latency_section());
        md.push_str(&self.recommendation());
        md.push_str(&self.mid_load_section());
        md.push_str("---\n\n");
        md.push_str(&self.chapters());

        md.push_str("---\n\n");
        md.push_str("- QPS cells show `-` when an environment has no result for that run.\n");
        md.push_str("- CPU/IO columns are tsar means over each run window.\n");
        md
    }

    pub fn write<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        fs::write(path, self.to_markdown())
            .with_context(|| format!("Failed to write merged report: {}", path.display()))?;
        info!(
            environments = self.environments.len(),
            path = %path.display(),
            "wrote merged report"
        );
        Ok(())
    }
}
