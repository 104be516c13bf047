use std::io::Write;

use todo_core::{parse_date, ApiError, FiltersPatch, TodoForm, TodoStore, Transport, UpdateTodo};
use tracing::debug;

use crate::args::{Command, CreateArgs, ListArgs, OutputFormat, UpdateArgs};
use crate::render;

pub async fn run<T: Transport>(
    store: &TodoStore<T>,
    command: Command,
    format: OutputFormat,
    out: &mut impl Write,
) -> Result<(), anyhow::Error> {
    debug!(?command, "running command");
    match command {
        Command::List(args) => list_cmd(store, args, format, out).await,
        Command::Show(args) => {
            let todo = store.fetch_one(&args.id).await.map_err(user_error)?;
            render::todo(out, &todo, format)?;
            Ok(())
        }
        Command::Create(args) => create_cmd(store, args, format, out).await,
        Command::Update(args) => update_cmd(store, args, format, out).await,
        Command::Delete(args) => {
            let response = store.remove(&args.id).await.map_err(user_error)?;
            render::deleted(out, &args.id, &response.message, format)?;
            Ok(())
        }
    }
}

async fn list_cmd<T: Transport>(
    store: &TodoStore<T>,
    args: ListArgs,
    format: OutputFormat,
    out: &mut impl Write,
) -> Result<(), anyhow::Error> {
    store.set_filters(list_patch(args));
    store.refresh().await.map_err(user_error)?;

    let state = store.snapshot();
    render::page(out, &state.items, state.meta.as_ref(), format)?;
    Ok(())
}

fn list_patch(args: ListArgs) -> FiltersPatch {
    FiltersPatch {
        page: Some(args.page),
        limit: Some(args.limit),
        sort: Some(args.sort.into()),
        order: Some(args.order.into()),
        title: Some(args.title),
        description: Some(args.description),
        is_completed: Some(args.completed),
        ..FiltersPatch::default()
    }
}

async fn create_cmd<T: Transport>(
    store: &TodoStore<T>,
    args: CreateArgs,
    format: OutputFormat,
    out: &mut impl Write,
) -> Result<(), anyhow::Error> {
    let form = TodoForm {
        title: args.title,
        description: args.description,
        start_date: args.start,
        end_date: args.end,
        is_completed: false,
    };
    let input = form.to_create().map_err(user_error)?;
    let todo = store.create(input).await.map_err(user_error)?;
    render::todo(out, &todo, format)?;
    Ok(())
}

async fn update_cmd<T: Transport>(
    store: &TodoStore<T>,
    args: UpdateArgs,
    format: OutputFormat,
    out: &mut impl Write,
) -> Result<(), anyhow::Error> {
    let patch = UpdateTodo {
        title: args.title,
        description: args.description,
        start_date: args
            .start
            .map(|raw| parse_date("start date", &raw))
            .transpose()
            .map_err(user_error)?,
        end_date: args
            .end
            .map(|raw| parse_date("end date", &raw))
            .transpose()
            .map_err(user_error)?,
        is_completed: args.completed,
    };
    anyhow::ensure!(!patch.is_empty(), "nothing to update");

    let todo = store.update(&args.id, patch).await.map_err(user_error)?;
    render::todo(out, &todo, format)?;
    Ok(())
}

/// Reports the same text the store records in `TodoState::error`.
fn user_error(err: ApiError) -> anyhow::Error {
    anyhow::anyhow!(err.message())
}
