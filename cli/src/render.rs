use std::io::{self, Write};

use todo_core::{PageMeta, Todo};

use crate::args::OutputFormat;

const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn todo(out: &mut impl Write, todo: &Todo, format: OutputFormat) -> io::Result<()> {
    match format {
        OutputFormat::Json => json(out, todo),
        OutputFormat::Pretty => {
            todo_line(out, todo)?;
            writeln!(out, "    {}", todo.description)
        }
    }
}

pub fn page(
    out: &mut impl Write,
    items: &[Todo],
    meta: Option<&PageMeta>,
    format: OutputFormat,
) -> io::Result<()> {
    if format == OutputFormat::Json {
        return json(
            out,
            &serde_json::json!({
                "data": items,
                "meta": meta,
            }),
        );
    }

    if items.is_empty() {
        writeln!(out, "No todos found")?;
    }
    for item in items {
        todo_line(out, item)?;
    }
    if let Some(meta) = meta {
        writeln!(
            out,
            "Page {} of {} ({} total)",
            meta.page,
            meta.total_pages.max(1),
            meta.total
        )?;
    }
    Ok(())
}

pub fn deleted(out: &mut impl Write, id: &str, message: &str, format: OutputFormat) -> io::Result<()> {
    match format {
        OutputFormat::Json => json(out, &serde_json::json!({ "id": id, "message": message })),
        OutputFormat::Pretty => writeln!(out, "{message}: {id}"),
    }
}

fn todo_line(out: &mut impl Write, todo: &Todo) -> io::Result<()> {
    let mark = if todo.is_completed { 'x' } else { ' ' };
    writeln!(
        out,
        "[{mark}] {}  {} -> {}  ({})",
        todo.title,
        todo.start_date.format(DATE_FORMAT),
        todo.end_date.format(DATE_FORMAT),
        todo.id
    )
}

fn json(out: &mut impl Write, value: &impl serde::Serialize) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)
}
