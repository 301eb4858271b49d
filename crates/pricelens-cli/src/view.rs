//! Terminal rendering for catalog results, stats and calculators

use console::{StyledObject, style};
use unicode_width::UnicodeWidthStr;

use pricelens_core::{
    Badge, CatalogApp, CatalogStats, CostRow, DataStatus, FilterOptions, GuidedRow, Record,
    RoiTier, TableRow, Task, ViewMode, comparison_rows, format_context, format_cost, format_price,
    format_roi, truncate_str,
};

const NAME_WIDTH: usize = 28;
const CELL_WIDTH: usize = 22;

/// Pad to a display width; labels may be Cyrillic or contain wide glyphs
fn pad(text: &str, width: usize) -> String {
    let used = UnicodeWidthStr::width(text);
    format!("{}{}", text, " ".repeat(width.saturating_sub(used)))
}

fn roi_styled(roi: f64, tier: RoiTier, width: usize) -> StyledObject<String> {
    let text = format!("{:>width$}", format_roi(roi));
    match tier {
        RoiTier::High => style(text).green().bold(),
        RoiTier::Medium => style(text).yellow(),
        RoiTier::Low => style(text).dim(),
    }
}

fn badge_styled(badge: Badge) -> StyledObject<&'static str> {
    match badge {
        Badge::BestDeal => style(badge.label()).green(),
        Badge::Fastest => style(badge.label()).cyan(),
        Badge::Premium => style(badge.label()).magenta(),
    }
}

fn badge_line(row: &TableRow) -> String {
    row.badges
        .iter()
        .map(|b| format!("[{}]", badge_styled(*b)))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Render the filtered set in the active view mode
pub fn render_results(app: &CatalogApp, rows: &[TableRow]) {
    if let DataStatus::Loading = app.status() {
        println!("{}", style("Loading catalog...").dim());
        return;
    }

    let mut header = format!(
        "{} of {} models",
        style(rows.len()).bold(),
        app.all_records().len()
    );
    if let Some(preset) = app.active_preset() {
        header.push_str(&format!("  {} {}", style("preset:").dim(), style(preset).cyan()));
    }
    if !app.selection().is_empty() {
        header.push_str(&format!("  {} {}", style("selected:").dim(), app.selection().len()));
    }
    println!("{}", header);
    println!();

    if rows.is_empty() {
        println!("{}", style("No models match the current filters.").yellow());
        return;
    }

    match app.view() {
        ViewMode::Table => render_table(rows),
        ViewMode::Cards => render_cards(rows),
        ViewMode::Chart => {
            println!("{}", style("Chart view is not available in the terminal.").dim());
        }
    }
}

fn render_table(rows: &[TableRow]) {
    println!(
        "{}",
        style(format!(
            "  {} {} {:>10} {:>10} {:>8} {:>6} {:>8}  {}",
            pad("Model", NAME_WIDTH),
            pad("Provider", 14),
            "Input",
            "Output",
            "Context",
            "ROI",
            "Savings",
            "Badges"
        ))
        .bold()
    );

    for row in rows {
        let marker = if row.selected { style("*").green().to_string() } else { " ".to_string() };
        let record = &row.record;
        println!(
            "{} {} {} {:>10} {:>10} {:>8} {} {:>7}%  {}",
            marker,
            pad(&truncate_str(&record.name, NAME_WIDTH), NAME_WIDTH),
            pad(&truncate_str(&record.provider, 14), 14),
            format_price(record.input_price),
            format_price(record.output_price),
            format_context(record.context_window),
            roi_styled(row.roi, row.roi_tier, 6),
            row.savings_percent,
            badge_line(row)
        );
    }
}

fn render_cards(rows: &[TableRow]) {
    for row in rows {
        let record = &row.record;
        let title = if row.selected {
            style(format!("{} (selected)", record.name)).bold().green()
        } else {
            style(record.name.clone()).bold()
        };
        println!("{}  {}", title, badge_line(row));
        println!("  {} {}", style(&record.provider).cyan(), style(record.key()).dim());
        println!(
            "  {} in / {} out per 1M  {}  {}",
            format_price(record.input_price),
            format_price(record.output_price),
            format_context(record.context_window),
            record.modality
        );
        println!(
            "  ROI {}  saves {}%  {} / {}  {}",
            roi_styled(row.roi, row.roi_tier, 0),
            row.savings_percent,
            record.speed,
            record.quality,
            record.availability
        );
        if !row.use_cases.is_empty() {
            let tags: Vec<_> = row.use_cases.iter().map(|u| u.label()).collect();
            println!("  {}", style(tags.join(", ")).dim());
        }
        if !record.specialization.is_empty() {
            println!("  {}", record.specialization);
        }
        if !record.docs_url.is_empty() {
            println!("  {} {}", style("Docs:").dim(), style(&record.docs_url).underlined());
        }
        println!();
    }
}

pub fn render_stats(stats: &CatalogStats, options: &FilterOptions) {
    println!("{}", style("Catalog").bold());
    println!("  {} {}", pad("Models:", 16), stats.total);
    println!("  {} {}", pad("Providers:", 16), options.providers.len());
    println!("  {} up to {}%", pad("Savings:", 16), stats.max_savings_percent);
    println!("  {} {}", pad("Modalities:", 16), options.modalities.join(", "));
    println!();
    println!("{}", style("Popular").bold());
    for code in &stats.popular {
        println!("  {}", code);
    }
    println!();
    println!("{}", style("Best deals").bold());
    for code in &stats.best_deals {
        println!("  {}", style(code).green());
    }
}

pub fn render_freeform(rows: &[CostRow], input_tokens: u64, output_tokens: u64) {
    println!(
        "{} {} input + {} output tokens",
        style("Estimated cost for").bold(),
        input_tokens,
        output_tokens
    );
    println!();
    if rows.is_empty() {
        println!("{}", style("No models match the current filters.").yellow());
        return;
    }

    for row in rows {
        println!(
            "  {} {:>12} {:>12} {:>12}",
            pad(&truncate_str(&row.record.name, NAME_WIDTH), NAME_WIDTH),
            format_cost(row.cost.input_cost),
            format_cost(row.cost.output_cost),
            style(format_cost(row.cost.total)).bold()
        );
    }
}

pub fn render_guided(rows: &[GuidedRow], task: Task, volume_millions: u64) {
    println!(
        "{} {} at {}M tokens in and out",
        style("Recommended for").bold(),
        style(task).cyan(),
        volume_millions
    );
    println!();
    if rows.is_empty() {
        println!("{}", style("No models support this task.").yellow());
        return;
    }

    for (rank, row) in rows.iter().enumerate() {
        println!(
            "  {}. {} {} {:>12}  ROI {}",
            rank + 1,
            pad(&truncate_str(&row.record.name, NAME_WIDTH), NAME_WIDTH),
            pad(&truncate_str(&row.record.provider, 14), 14),
            format_cost(row.total_cost),
            roi_styled(row.roi, RoiTier::of(row.roi), 0)
        );
    }
}

pub fn render_comparison(records: &[Record]) {
    let label_width = comparison_rows(records)
        .iter()
        .map(|row| UnicodeWidthStr::width(row.label.as_str()))
        .max()
        .unwrap_or(0)
        + 2;

    print!("{}", pad("", label_width));
    for record in records {
        print!("{}", style(pad(&truncate_str(&record.name, CELL_WIDTH - 2), CELL_WIDTH)).bold());
    }
    println!();

    for row in comparison_rows(records) {
        print!("{}", style(pad(&row.label, label_width)).dim());
        for value in &row.values {
            print!("{}", pad(&truncate_str(value, CELL_WIDTH - 2), CELL_WIDTH));
        }
        println!();
    }
}
