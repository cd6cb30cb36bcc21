//! Plain-text rendering of the view models for the terminal.

use std::fmt::Write;

use crate::auth::UserDisplay;
use crate::chips::{ChipKind, ChipView};
use crate::profile::controls::ControlsView;
use crate::profile::ProfileEditor;
use crate::recommendation::{RecommendationCard, RoadmapView};

const BAR_WIDTH: usize = 20;

pub fn chips(views: &[ChipView]) -> String {
    if views.is_empty() {
        return "(none)".to_string();
    }
    views
        .iter()
        .map(|chip| {
            if chip.removable {
                format!("[{} x]", chip.label)
            } else {
                format!("[{}]", chip.label)
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn suggestions(items: &[String]) -> String {
    if items.is_empty() {
        return "No matches".to_string();
    }
    items
        .iter()
        .map(|item| format!("  - {item}"))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn controls(view: &ControlsView) -> String {
    let mut out = String::new();
    for c in &view.sections {
        let marker = if c.section == view.active { ">" } else { " " };
        let status = if c.saved { "saved" } else { "pending" };
        let lock = if c.inputs_enabled { "" } else { " (locked)" };
        let _ = writeln!(out, "{marker} {:<24} {status}{lock}", c.section.title());
    }
    let finalize = if view.finalize_enabled { "enabled" } else { "disabled" };
    let _ = writeln!(out, "\n{}: {finalize}", view.finalize_label);
    if view.edit_visible {
        let _ = writeln!(out, "Edit Info available");
    }
    out
}

pub fn profile(editor: &ProfileEditor) -> String {
    let mut out = String::new();
    let form = editor.form();
    let _ = writeln!(
        out,
        "Profile completion: {}/10",
        editor.completion().count()
    );
    if !form.full_name.is_empty() {
        let _ = writeln!(out, "Name: {}", form.full_name);
    }
    if !form.current_education.is_empty() {
        let _ = writeln!(out, "Current education: {}", form.current_education);
    }
    out.push('\n');
    out.push_str(&controls(&editor.controls()));
    out.push('\n');
    for kind in ChipKind::ALL {
        let _ = writeln!(out, "{:<11} {}", format!("{kind}:"), chips(&editor.chip_views(kind)));
    }
    let formats = form.learning_formats.selected();
    if !formats.is_empty() {
        let _ = writeln!(out, "Learning:   {}", formats.join(", "));
    }
    let environments = form.work_environment.selected();
    if !environments.is_empty() {
        let _ = writeln!(out, "Work env:   {}", environments.join(", "));
    }
    if let Some(salary) = form.salary.selected() {
        let _ = writeln!(out, "Salary:     {salary}");
    }
    for (idx, cert) in form.certifications.items().iter().enumerate() {
        let _ = writeln!(out, "Cert #{idx}:    {} ({}, {})", cert.name, cert.org, cert.issue_date);
    }
    out
}

pub fn cards(cards: &[RecommendationCard]) -> String {
    let mut out = String::new();
    for card in cards {
        let filled = (card.match_strength as usize * BAR_WIDTH) / 100;
        let _ = writeln!(
            out,
            "#{} {}\n   [{}{}] {}% match strength",
            card.rank,
            card.career,
            "#".repeat(filled),
            ".".repeat(BAR_WIDTH - filled),
            card.match_strength
        );
    }
    out
}

pub fn roadmap(view: &RoadmapView) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Roadmap: {}", view.career);
    if let Some(summary) = &view.summary {
        let _ = writeln!(out, "{summary}");
    }
    let _ = writeln!(out, "\nCore skill gaps: {}", view.core_gaps);
    let _ = writeln!(out, "Nice-to-have gaps: {}", view.nice_gaps);

    for phase in &view.phases {
        let _ = writeln!(
            out,
            "\nPhase {}: {} (~ {} months)",
            phase.number, phase.title, phase.duration
        );
        for task in &phase.tasks {
            let level = task
                .level
                .as_deref()
                .map(|l| format!(" [{l}]"))
                .unwrap_or_default();
            let status = task
                .status
                .as_deref()
                .map(|s| format!(" · {s}"))
                .unwrap_or_default();
            let _ = writeln!(
                out,
                "  - {}{level} ({}{status})",
                task.title,
                task.priority.label()
            );
            if let Some(description) = &task.description {
                let _ = writeln!(out, "      {description}");
            }
            if let Some(hint) = &task.format_hint {
                let _ = writeln!(out, "      {hint}");
            }
        }
    }

    if !view.courses.is_empty() {
        let _ = writeln!(out, "\nSuggested Courses");
        for course in &view.courses {
            let _ = writeln!(
                out,
                "  - {} ({} · {}) {} {}\n    {}",
                course.title, course.provider, course.platform, course.level, course.focus, course.url
            );
        }
    }
    out
}

pub fn user(display: Option<&UserDisplay>) -> String {
    match display {
        Some(user) => format!("({}) {} <{}>", user.initial, user.name, user.email),
        None => "Not logged in".to_string(),
    }
}
