//! Plain-text rendering of a snapshot, one block per replayed command.

use artillery_solver::Snapshot;

fn row(label: &str, value: &str) -> String {
    format!("  {label:<16}{value}\n")
}

pub fn render_text(step: usize, label: &str, snap: &Snapshot) -> String {
    let mut out = format!("[{step}] {label}\n");
    out.push_str(&row(
        "Artillery:",
        &format!(
            "{} (spread {:.1} / {:.1} m)",
            snap.artillery, snap.envelope.inner_radius, snap.envelope.outer_radius
        ),
    ));
    out.push_str(&row("Spotter:", &snap.spotter_text));
    for team in &snap.teams {
        let flag = match team.within_range {
            Some(false) => "  (out of range)",
            _ => "",
        };
        out.push_str(&row(
            &format!("{}:", team.name),
            &format!("{}{flag}", team.solution_text),
        ));
    }
    out.push_str(&row("Impacts:", &snap.impacts.len().to_string()));
    out.push_str(&row("Advice:", &snap.recommendation_text));
    out
}
