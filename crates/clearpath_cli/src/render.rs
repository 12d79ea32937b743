use clearpath_core::{
    AppViewModel, CardView, EntityDetail, FormView, MatchRowView, ResultsView, RouteView,
    StateCardView, TrademarkCardView, TrademarkMark,
};

const PLACEHOLDER: &str = "Loading search details...";

pub fn render(view: &AppViewModel) -> Vec<String> {
    match &view.route {
        RouteView::Home(form) => render_form(form),
        RouteView::Results(results) => render_results(results),
    }
}

fn render_form(form: &FormView) -> Vec<String> {
    let mut lines = vec![format!("Search: {} ({})", form.name, form.entity_type)];
    if !form.states.is_empty() {
        lines.push(format!("States: {}", form.states.join(", ")));
    }
    if form.submitting {
        lines.push("Submitting...".to_string());
    }
    if let Some(error) = &form.error {
        lines.push(format!("Error: {error}"));
    }
    lines
}

fn render_results(view: &ResultsView) -> Vec<String> {
    let header = match (&view.search_name, &view.entity_type) {
        (Some(name), Some(entity_type)) => format!("{name} ({entity_type})"),
        _ => PLACEHOLDER.to_string(),
    };
    let mut lines = vec![
        header,
        format!("Job {} | {}", view.job_id, view.status_label),
        view.summary.headline(),
    ];
    for card in &view.cards {
        lines.push(String::new());
        match card {
            CardView::Trademark(card) => render_trademark(card, &mut lines),
            CardView::State(card) => render_state(card, &mut lines),
        }
    }
    lines
}

fn render_trademark(card: &TrademarkCardView, lines: &mut Vec<String>) {
    lines.push(format!("[USPTO] Trademark risk: {}", card.risk.label()));
    for mark in &card.exact_matches {
        lines.push(format!("  exact: {}", format_mark(mark)));
    }
    for mark in &card.similar_marks {
        lines.push(format!("  similar: {}", format_mark(mark)));
    }
    if !card.notes.is_empty() {
        lines.push(format!("  {}", card.notes));
    }
}

fn render_state(card: &StateCardView, lines: &mut Vec<String>) {
    let name = if card.state_name.is_empty() {
        card.state_code.as_str()
    } else {
        card.state_name.as_str()
    };
    lines.push(format!(
        "[{}] {}: {} ({}% confidence)",
        card.state_code,
        name,
        card.availability.label(),
        card.confidence_percent
    ));
    if !card.similar_names.is_empty() {
        lines.push(format!("  similar names: {}", card.similar_names.join(", ")));
    }
    for flag in &card.flags {
        lines.push(format!("  ! {flag}"));
    }
    if !card.notes.is_empty() {
        lines.push(format!("  {}", card.notes));
    }
    for row in &card.matches {
        render_match(row, lines);
    }
}

fn render_match(row: &MatchRowView, lines: &mut Vec<String>) {
    let marker = if row.expanded { "v" } else { ">" };
    let name = row.name.as_deref().unwrap_or("(unnamed)");
    match &row.file_number {
        Some(number) => lines.push(format!("  {marker} {name} #{number}")),
        None => lines.push(format!("  {marker} {name}")),
    }
    if !row.expanded {
        return;
    }
    if row.loading {
        lines.push("      loading details...".to_string());
    } else if let Some(detail) = &row.detail {
        render_detail(detail, lines);
    } else if row.file_number.is_none() {
        lines.push("      no file number; details unavailable".to_string());
    }
}

fn render_detail(detail: &EntityDetail, lines: &mut Vec<String>) {
    if let Some(error) = &detail.error {
        lines.push(format!("      error: {error}"));
    }
    let fields = [
        ("name", &detail.entity_name),
        ("kind", &detail.entity_kind),
        ("formed", &detail.formation_date),
        ("agent", &detail.registered_agent),
    ];
    for (label, value) in fields {
        if let Some(value) = value {
            lines.push(format!("      {label}: {value}"));
        }
    }
    if let Some(url) = &detail.reference_url {
        lines.push(format!("      {url}"));
    }
    if detail.cached {
        lines.push("      (cached)".to_string());
    }
}

fn format_mark(mark: &TrademarkMark) -> String {
    let mut text = format!("{} [{}]", mark.mark, if mark.live { "live" } else { "dead" });
    if !mark.status.is_empty() {
        text.push_str(&format!(" {}", mark.status));
    }
    if !mark.serial_number.is_empty() {
        text.push_str(&format!(" serial {}", mark.serial_number));
    }
    if !mark.owner.is_empty() {
        text.push_str(&format!(" owner {}", mark.owner));
    }
    if !mark.classes.is_empty() {
        text.push_str(&format!(" classes {}", mark.classes.join(", ")));
    }
    text
}
