// Interactive console - the two-pane dashboard rendered as text

use crate::application::charts::{build_chart, build_table};
use crate::application::compare::{Comparison, compare, default_pair};
use crate::application::export::{write_csv, write_report};
use crate::application::market_repository::MarketRepository;
use crate::application::session::{DashboardSession, SessionEvent};
use crate::domain::catalog::{ControlKind, INDUSTRIES, filter_tree, industry_offers};
use crate::domain::chart::{ChartKind, ChartModel, TableModel};
use crate::domain::chat::{Role, Segment, split_citations};
use crate::domain::filters::{DensityLevel, TimePeriod, ViewMode};
use crate::infrastructure::backend_client::BackendClient;
use crate::infrastructure::token_store::TokenStore;
use crate::presentation::app_state::AppState;
use anyhow::Result;
use std::io::Write as _;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::io::{BufReader, Lines, Stdin};

const BAR_WIDTH: usize = 40;

fn prompt(text: &str) {
    print!("{}", text);
    let _ = std::io::stdout().flush();
}

async fn read_line(lines: &mut Lines<BufReader<Stdin>>) -> Option<String> {
    lines.next_line().await.ok().flatten()
}

/// Interactive login, looping until the backend issues a token. The token
/// lands both in the client and in the local store.
pub async fn login_flow(
    client: &BackendClient,
    tokens: &TokenStore,
    lines: &mut Lines<BufReader<Stdin>>,
) -> Result<()> {
    // Any stale token is dropped before a fresh sign-in.
    tokens.clear();
    println!("Sign in to access market intelligence.");
    loop {
        prompt("username: ");
        let Some(username) = read_line(lines).await else { anyhow::bail!("stdin closed") };
        prompt("password: ");
        let Some(password) = read_line(lines).await else { anyhow::bail!("stdin closed") };

        match client.login(username.trim(), password.trim()).await {
            Ok(token) => {
                tokens.store(&token)?;
                println!("Signed in.");
                return Ok(());
            }
            Err(e) => {
                tracing::warn!("login failed: {}", e);
                println!("Login failed, try again.");
            }
        }
    }
}

/// One-time industry selection. A save failure is logged and the user
/// proceeds regardless.
pub async fn onboarding_flow(state: &AppState, lines: &mut Lines<BufReader<Stdin>>) {
    println!("Select your primary industry: {}", INDUSTRIES.join(", "));
    prompt("industry [Retail]: ");
    let choice = match read_line(lines).await {
        Some(line) if !line.trim().is_empty() => line.trim().to_string(),
        _ => "Retail".to_string(),
    };

    state.session.set_industry(&choice);
    if let Err(e) = state.repository.save_profile(&choice).await {
        tracing::warn!("failed to save industry profile: {}", e);
    }
}

/// Raise a flag whenever the shared row set is replaced, whatever path
/// replaced it: a filter-driven re-fetch or a chat data push. The loop
/// drains the flag after each command to refresh the insight card.
fn watch_data_replaced(session: &DashboardSession) -> Arc<AtomicBool> {
    let flag = Arc::new(AtomicBool::new(false));
    let raised = flag.clone();
    session.subscribe(Box::new(move |event| {
        if event == SessionEvent::DataReplaced {
            raised.store(true, Ordering::SeqCst);
        }
    }));
    flag
}

/// Main console loop: mutate filters, re-fetch, re-derive views.
pub async fn run(state: AppState, lines: &mut Lines<BufReader<Stdin>>) -> Result<()> {
    let mut chart_kind = ChartKind::Bar;
    let data_replaced = watch_data_replaced(&state.session);

    state.explorer.refresh().await;
    render_chart_view(&state, chart_kind);
    if data_replaced.swap(false, Ordering::SeqCst) {
        print_insight(&state).await;
    }
    println!("Type 'help' for commands.");

    loop {
        prompt("> ");
        let Some(line) = read_line(lines).await else { break };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let (command, rest) = match line.split_once(' ') {
            Some((c, r)) => (c, r.trim()),
            None => (line, ""),
        };

        match command {
            "quit" | "exit" => break,
            "help" => print_help(),
            "filters" => print_filters(&state),
            "metrics" => print_metrics(&state, rest).await,
            "metric" => {
                state.session.set_metric(rest);
                state.explorer.refresh().await;
                render_chart_view(&state, chart_kind);
                // Selecting a metric refreshes the insight even when the
                // fetch failed and the previous rows stayed.
                data_replaced.store(true, Ordering::SeqCst);
            }
            "districts" => {
                for district in state.explorer.districts().await {
                    println!("  {}", district);
                }
            }
            "district" => {
                state.session.update_filters(|f| f.toggle_district(rest));
                state.explorer.refresh().await;
                render_chart_view(&state, chart_kind);
            }
            "density" => set_density(&state, rest).await,
            "traffic" => set_traffic(&state, rest).await,
            "period" => match TimePeriod::from_label(rest) {
                Some(period) => state.session.update_filters(|f| f.time_period = period),
                None => println!(
                    "Unknown period. Options: {}",
                    TimePeriod::ALL.map(|p| p.label()).join(", ")
                ),
            },
            "rent" => set_rent(&state, rest),
            "industry" => {
                state.session.set_industry(rest);
                print_filters(&state);
            }
            "mode" => set_mode(&state, rest).await,
            "chart" => {
                if !rest.is_empty() {
                    match ChartKind::from_label(rest) {
                        Some(kind) => chart_kind = kind,
                        None => {
                            println!(
                                "Unknown chart kind. Options: {}",
                                ChartKind::ALL.map(|k| k.label()).join(", ")
                            );
                            continue;
                        }
                    }
                }
                render_chart_view(&state, chart_kind);
            }
            "table" => {
                let rows = state.session.data().unwrap_or_default();
                let metric = state.session.filters().metric;
                render_table(&build_table(&rows, &metric));
            }
            "export" => export(&state, rest),
            "compare" => run_compare(&state, rest),
            "ask" => {
                if rest.is_empty() {
                    println!("Usage: ask <question>");
                    continue;
                }
                let reply = state.chat.send(rest).await;
                render_assistant(&reply);
            }
            "sim" => {
                let on = state.chat.toggle_simulation_mode();
                println!("Simulation mode {}", if on { "on" } else { "off" });
            }
            "transcript" => print_transcript(&state),
            "insight" => print_insight(&state).await,
            _ => println!("Unknown command '{}'. Type 'help'.", command),
        }

        // Any command that replaced the rows gets a fresh insight, the
        // chat data push included.
        if data_replaced.swap(false, Ordering::SeqCst) {
            print_insight(&state).await;
        }
    }

    Ok(())
}

fn print_help() {
    println!("Commands:");
    println!("  filters                   show current selection");
    println!("  metrics [query]           browse the metric hierarchy");
    println!("  metric <name>             select a metric and re-fetch");
    println!("  districts / district <n>  list or toggle districts");
    println!("  density <level>           toggle a competitor density filter");
    println!("  traffic <0-10>            minimum foot-traffic score");
    println!("  period <label>            reporting period");
    println!("  rent <min> <max>          rent range in EGP/sqm");
    println!("  industry <name>           switch industry context");
    println!("  mode explore|compare      switch view mode");
    println!("  chart [kind] / table      render the current rows");
    println!("  export csv|report         write the table to a file");
    println!("  compare [a] [b]           side-by-side district comparison");
    println!("  ask <question> / sim      AI console and simulation toggle");
    println!("  transcript / insight      chat history and AI insight");
    println!("  quit");
}

fn print_filters(state: &AppState) {
    let filters = state.session.filters();
    let (rent_min, rent_max) = filters.rent_bounds();
    println!("Industry:  {}", filters.industry);
    println!("Metric:    {}", filters.metric);
    println!("Period:    {}", filters.time_period.label());
    println!(
        "Districts: {}",
        if filters.districts.is_empty() { "all".to_string() } else { filters.districts.join(", ") }
    );
    if industry_offers(&filters.industry, ControlKind::Density) {
        let levels: Vec<&str> = filters.density.iter().map(DensityLevel::label).collect();
        println!("Density:   {}", if levels.is_empty() { "all".to_string() } else { levels.join(", ") });
    }
    if industry_offers(&filters.industry, ControlKind::Traffic) {
        println!("Traffic:   >= {}", filters.traffic);
    }
    if industry_offers(&filters.industry, ControlKind::RentRange) {
        println!("Rent:      {} - {} EGP/sqm", rent_min, rent_max);
    }
    println!(
        "Mode:      {}",
        match state.session.view_mode() {
            ViewMode::Explore => "explore",
            ViewMode::Compare => "compare",
        }
    );
}

async fn print_metrics(state: &AppState, query: &str) {
    match state.repository.hierarchy().await {
        Ok(tree) => {
            let tree = filter_tree(&tree, query);
            if tree.is_empty() {
                println!("No metrics match '{}'.", query);
            }
            for sector in tree {
                println!("{}", sector.name);
                for item in sector.items {
                    println!("  {:<24} {}", item.name, item.label);
                }
            }
        }
        Err(e) => {
            tracing::warn!("failed to fetch hierarchy: {}", e);
            println!("Could not load the metric hierarchy.");
        }
    }
}

async fn set_density(state: &AppState, rest: &str) {
    let industry = state.session.filters().industry;
    if !industry_offers(&industry, ControlKind::Density) {
        println!("Density filter is not offered for {}.", industry);
        return;
    }
    match DensityLevel::from_label(rest) {
        Some(level) => {
            state.session.update_filters(|f| f.toggle_density(level));
            state.explorer.refresh().await;
        }
        None => println!("Density levels: High, Medium, Low"),
    }
}

async fn set_traffic(state: &AppState, rest: &str) {
    let industry = state.session.filters().industry;
    if !industry_offers(&industry, ControlKind::Traffic) {
        println!("Traffic filter is not offered for {}.", industry);
        return;
    }
    match rest.parse::<u8>() {
        Ok(value) if value <= 10 => {
            state.session.update_filters(|f| f.traffic = value);
            state.explorer.refresh().await;
        }
        _ => println!("Traffic threshold must be 0-10."),
    }
}

fn set_rent(state: &AppState, rest: &str) {
    let parts: Vec<i64> = rest.split_whitespace().filter_map(|p| p.parse().ok()).collect();
    match parts.as_slice() {
        // Stored as given; reads clamp through rent_bounds.
        [min, max] => state.session.update_filters(|f| f.rent_range = (*min, *max)),
        _ => println!("Usage: rent <min> <max>"),
    }
}

async fn set_mode(state: &AppState, rest: &str) {
    let mode = match rest {
        "explore" => ViewMode::Explore,
        "compare" => ViewMode::Compare,
        _ => {
            println!("Usage: mode explore|compare");
            return;
        }
    };
    state.session.set_view_mode(mode);
    // Compare mode needs the unfiltered candidate set.
    state.explorer.refresh().await;
    if mode == ViewMode::Compare {
        run_compare(state, "");
    }
}

fn export(state: &AppState, rest: &str) {
    let rows = state.session.data().unwrap_or_default();
    let metric = state.session.filters().metric;
    let table = build_table(&rows, &metric);
    let dir = std::path::Path::new(".");
    let written = match rest {
        "csv" => write_csv(&table, &metric, dir),
        "report" => write_report(&table, &metric, dir),
        _ => {
            println!("Usage: export csv|report");
            return;
        }
    };
    match written {
        Ok(path) => println!("Wrote {}", path.display()),
        Err(e) => {
            tracing::warn!("export failed: {:#}", e);
            println!("Export failed.");
        }
    }
}

fn run_compare(state: &AppState, rest: &str) {
    let rows = state.session.data().unwrap_or_default();
    if rows.is_empty() {
        println!("No data to compare yet.");
        return;
    }
    let parts: Vec<&str> = rest.split_whitespace().collect();
    let (baseline, target) = match parts.as_slice() {
        [a, b] => (a.to_string(), b.to_string()),
        _ => default_pair(&rows),
    };
    render_comparison(&compare(&rows, &baseline, &target));
}

fn render_chart_view(state: &AppState, kind: ChartKind) {
    let rows = state.session.data().unwrap_or_default();
    let metric = state.session.filters().metric;
    if state.session.loading() {
        println!("(loading...)");
    }
    if rows.is_empty() {
        println!("Ready to analyze. Select a metric or ask a question to see live market data.");
        return;
    }
    render_chart(&build_chart(&rows, &metric, kind));
}

fn render_chart(model: &ChartModel) {
    match model {
        ChartModel::Cartesian { kind, categories, series } => {
            let width = BAR_WIDTH;
            for s in series {
                println!("{} ({})", s.name, kind.label());
                let max = s.values.iter().cloned().fold(f64::MIN, f64::max).max(1.0);
                for (category, value) in categories.iter().zip(&s.values) {
                    let filled = ((value / max) * width as f64).round().max(0.0) as usize;
                    println!("  {:<16} {:<width$} {}", category, "#".repeat(filled.min(width)), value);
                }
            }
        }
        ChartModel::Circular { kind, labels, magnitudes } => {
            let total: f64 = magnitudes.iter().sum();
            println!("{} of {} values, total {}", kind.label(), labels.len(), total);
            for (label, value) in labels.iter().zip(magnitudes) {
                let share = if total > 0.0 { value / total * 100.0 } else { 0.0 };
                println!("  {:<16} {:>10}  {:>5.1}%", label, value, share);
            }
        }
    }
}

fn render_table(table: &TableModel) {
    let width = table
        .rows
        .iter()
        .map(|(c, _)| c.len())
        .chain([table.category_header.len()])
        .max()
        .unwrap_or(0);
    println!("{:<width$}  {}", table.category_header, table.metric_header);
    println!("{}", "-".repeat(width + 2 + table.metric_header.len()));
    for (category, value) in &table.rows {
        println!("{:<width$}  {}", category, value);
    }
}

fn render_comparison(comparison: &Comparison) {
    println!("{} vs {}", comparison.baseline, comparison.target);
    println!("{:<14} {:>10} {:>10}", "Metric", "Baseline", "Target");
    for row in &comparison.scorecard {
        println!("{:<14} {:>10} {:>10}", row.label, row.baseline, row.target);
    }
    println!("Normalized (0-100):");
    for (i, axis) in comparison.axes.iter().enumerate() {
        println!(
            "  {:<14} {:>3} | {:>3}",
            axis, comparison.baseline_scores[i], comparison.target_scores[i]
        );
    }
    println!("Values normalized to 0-100 scale for comparison.");
}

fn render_assistant(text: &str) {
    print!("ai: ");
    for segment in split_citations(text) {
        match segment {
            Segment::Text(t) => print!("{}", t),
            Segment::Citation(id) => print!("[#{}]", id),
        }
    }
    println!();
}

fn print_transcript(state: &AppState) {
    for message in state.chat.transcript() {
        match message.role {
            Role::User => println!("you: {}", message.content),
            Role::Assistant => render_assistant(&message.content),
        }
    }
}

async fn print_insight(state: &AppState) {
    let rows = state.session.data().unwrap_or_default();
    let filters = state.session.filters();
    let text = state.insight.refresh(&rows, &filters.metric, &filters).await;
    println!("insight: {}", text);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::chat::ChatService;
    use crate::application::explorer::ExplorerService;
    use crate::application::market_repository::AiReply;
    use crate::application::market_repository::testing::MockRepository;
    use serde_json::json;

    fn row(district: &str, rent: i64) -> crate::domain::market::DataRow {
        let mut fields = serde_json::Map::new();
        fields.insert("District".to_string(), json!(district));
        fields.insert("Avg_Rent_Sqm_EGP".to_string(), json!(rent));
        crate::domain::market::DataRow::new(fields)
    }

    #[tokio::test]
    async fn test_data_watch_fires_for_fetch_and_chat_push() {
        let repository = Arc::new(MockRepository::default());
        repository.set_rows(vec![row("Maadi", 2000)]);
        let session = Arc::new(DashboardSession::new());
        let watch = watch_data_replaced(&session);

        // Filter-driven re-fetch replaces the row set.
        let explorer = ExplorerService::new(repository.clone(), session.clone());
        session.update_filters(|f| f.toggle_district("Maadi"));
        explorer.refresh().await;
        assert!(watch.swap(false, Ordering::SeqCst));

        // So does a chat reply carrying a data_context payload.
        let chat = ChatService::new(repository.clone(), session.clone());
        repository.set_reply(AiReply {
            response: "Giza looks promising.".to_string(),
            data_context: Some(json!([{ "District": "Giza", "Avg_Rent_Sqm_EGP": 1500 }])),
        });
        chat.send("where should I open a store?").await;
        assert!(watch.swap(false, Ordering::SeqCst));
        assert_eq!(session.data().unwrap()[0].category(), "Giza");
    }

    #[tokio::test]
    async fn test_data_watch_quiet_when_rows_survive_a_failed_fetch() {
        let repository = Arc::new(MockRepository::default());
        repository.set_rows(vec![row("Zamalek", 4500)]);
        let session = Arc::new(DashboardSession::new());
        let explorer = ExplorerService::new(repository.clone(), session.clone());
        explorer.refresh().await;

        let watch = watch_data_replaced(&session);
        repository.fail_next();
        explorer.refresh().await;
        assert!(!watch.load(Ordering::SeqCst));

        // A chat reply without data_context leaves the rows alone too.
        let chat = ChatService::new(repository.clone(), session.clone());
        repository.set_reply(AiReply {
            response: "Rents in Zamalek are high.".to_string(),
            data_context: None,
        });
        chat.send("how are rents?").await;
        assert!(!watch.load(Ordering::SeqCst));
    }
}
