use chrono::{Local, LocalResult, TimeZone};
use docshelf_core::{AppViewModel, DocIcon, DocRowView, UploadDisplay};

/// Draw the whole view model. Every render is a full redraw, mirroring the
/// full-replace state it presents.
pub fn render(view: &AppViewModel) {
    println!();
    let chips: Vec<String> = view
        .chips
        .iter()
        .map(|chip| {
            if chip.active {
                format!("[{}*]", chip.label)
            } else {
                format!("[{}]", chip.label)
            }
        })
        .collect();
    println!("tags: {}", chips.join(" "));

    println!("documents ({}):", view.rows.len());
    for row in &view.rows {
        print_row(row);
    }

    match &view.upload {
        UploadDisplay::Empty => {}
        UploadDisplay::Queued(names) => {
            for name in names {
                println!("{name} — queued");
            }
        }
        UploadDisplay::Uploaded(count) => println!("Uploaded {count} file(s)."),
    }

    if let Some(modal) = &view.modal {
        println!(
            "Change tag for document {} — options: {} (selected: {})",
            modal.doc_id,
            modal.options.join(", "),
            modal.selected
        );
        println!("Type an option name, \"ok\" to update, or \"cancel\".");
    }
}

fn print_row(row: &DocRowView) {
    let mut meta = format!(
        "{} • {} KB • {}",
        row.filename,
        row.size_kb,
        format_updated(row.updated_at)
    );
    if let Some(tag) = &row.tag {
        meta.push_str(&format!(" • tag: {tag}"));
    }
    println!("{} {} ({})", glyph(row.icon), row.title, row.id);
    println!("   {meta}");
}

fn glyph(icon: DocIcon) -> &'static str {
    match icon {
        DocIcon::Pdf => "\u{1F4C4}",
        DocIcon::Markdown => "\u{1F4DD}",
        DocIcon::Text => "\u{1F4C3}",
        DocIcon::Generic => "\u{1F4E6}",
    }
}

fn format_updated(timestamp: i64) -> String {
    match Local.timestamp_opt(timestamp, 0) {
        LocalResult::Single(when) => when.format("%Y-%m-%d %H:%M").to_string(),
        _ => timestamp.to_string(),
    }
}
