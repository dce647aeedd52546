use log::{error, warn};
use std::env;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

use fridge_chef::pipeline::run_upload_with_progress;
use fridge_chef::{
    Action, App, AppConfig, CommandSynthesizer, DietaryTag, ImageSource, ProviderFactory,
    ReadAloudState, Tab, ViewState, DIETARY_FILTERS, NO_RECIPES_FOUND,
};

/// One line typed by the user
#[derive(Debug, PartialEq)]
enum Command {
    Upload(PathBuf),
    List,
    Filter(DietaryTag),
    Open(usize),
    Close,
    Read,
    Add(String),
    Remove(String),
    Shop,
    Clear,
    Tab(Tab),
    Reset,
    Retry,
    Help,
    Quit,
}

fn parse_command(line: &str) -> Result<Command, String> {
    let line = line.trim();
    let (word, rest) = line.split_once(' ').unwrap_or((line, ""));
    let rest = rest.trim();

    match word {
        "upload" if !rest.is_empty() => Ok(Command::Upload(PathBuf::from(rest))),
        "list" | "ls" => Ok(Command::List),
        "filter" => rest.parse().map(Command::Filter),
        "open" => rest
            .parse::<usize>()
            .ok()
            .filter(|n| *n >= 1)
            .map(|n| Command::Open(n - 1))
            .ok_or_else(|| format!("Expected a recipe number, got '{}'", rest)),
        "close" => Ok(Command::Close),
        "read" => Ok(Command::Read),
        "add" if !rest.is_empty() => Ok(Command::Add(rest.to_string())),
        "remove" if !rest.is_empty() => Ok(Command::Remove(rest.to_string())),
        "shop" => Ok(Command::Shop),
        "clear" => Ok(Command::Clear),
        "tab" => match rest {
            "recipes" => Ok(Command::Tab(Tab::Recipes)),
            "shopping" => Ok(Command::Tab(Tab::ShoppingList)),
            other => Err(format!("Unknown tab '{}'", other)),
        },
        "reset" => Ok(Command::Reset),
        "retry" => Ok(Command::Retry),
        "help" | "?" => Ok(Command::Help),
        "quit" | "exit" => Ok(Command::Quit),
        _ => Err(format!("Unknown command '{}'. Type 'help'.", line)),
    }
}

fn print_help() {
    println!("Commands:");
    println!("  upload <path>       analyze a fridge photo");
    println!("  list                show recipes (or the shopping list)");
    println!("  filter <tag>        toggle a dietary filter");
    println!("  open <n> / close    open or close a recipe");
    println!("  read                start or stop reading the open recipe aloud");
    println!("  add <n|item>        add an ingredient of the open recipe, or any item");
    println!("  remove <item>       remove an item from the shopping list");
    println!("  shop / clear        show or clear the shopping list");
    println!("  tab recipes|shopping");
    println!("  reset / retry / quit");
}

fn render(app: &App) {
    match app.view() {
        ViewState::NoImage => println!("Upload a photo of your fridge: upload <path>"),
        ViewState::Loading => println!("Our AI chef is preparing recipes for you..."),
        ViewState::Error(failure) => {
            println!("{}", failure.message());
            println!("Type 'retry' to try again.");
        }
        ViewState::Ready => match app.tab() {
            Tab::Recipes => render_recipes(app),
            Tab::ShoppingList => render_shopping_list(app),
        },
    }

    if let Some(recipe) = app.selected_recipe() {
        println!();
        println!("== {} ==", recipe.recipe_name);
        println!("Ingredients:");
        for (i, ingredient) in recipe.ingredients.iter().enumerate() {
            println!("  {}. {}", i + 1, ingredient);
        }
        println!("Instructions:");
        for (i, step) in recipe.instructions.iter().enumerate() {
            println!("  {}. {}", i + 1, step);
        }
        if app.read_aloud_state() == Some(ReadAloudState::Speaking) {
            println!("(reading aloud - type 'read' to stop)");
        }
    }
}

fn render_recipes(app: &App) {
    let active: Vec<_> = DIETARY_FILTERS
        .iter()
        .map(|f| {
            let mark = if app.active_filters().is_active(f.tag) {
                "x"
            } else {
                " "
            };
            format!("[{}] {}", mark, f.label)
        })
        .collect();
    println!("Filters: {}", active.join("  "));

    if app.shows_empty_state() {
        println!("{}", NO_RECIPES_FOUND);
        return;
    }

    for (i, recipe) in app.visible_recipes().iter().enumerate() {
        let tags: Vec<_> = recipe
            .dietary_restrictions
            .iter()
            .map(|t| t.label())
            .collect();
        println!(
            "{}. {} - {} - {} - {} kcal {}",
            i + 1,
            recipe.recipe_name,
            recipe.difficulty,
            recipe.prep_time,
            recipe.calories,
            if tags.is_empty() {
                String::new()
            } else {
                format!("[{}]", tags.join(", "))
            }
        );
    }
}

fn render_shopping_list(app: &App) {
    let list = app.shopping_list();
    if list.is_empty() {
        println!("Your shopping list is empty.");
        return;
    }
    println!("Shopping list ({}):", list.len());
    for item in list.items() {
        println!("  - {}", item);
    }
}

/// `add 2` adds the second ingredient of the open recipe; anything else is taken literally
fn resolve_item(app: &App, arg: &str) -> String {
    arg.parse::<usize>()
        .ok()
        .and_then(|n| n.checked_sub(1))
        .and_then(|i| app.selected_recipe()?.ingredients.get(i).cloned())
        .unwrap_or_else(|| arg.to_string())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let config = AppConfig::load()?;
    let provider = ProviderFactory::get_default_provider(&config)?;
    let synthesizer = Arc::new(CommandSynthesizer::new(config.speech.command.clone()));
    let mut app = App::new(synthesizer, config.speech.locale.clone());

    if let Some(path) = env::args().nth(1) {
        run_upload_with_progress(
            &mut app,
            provider.as_ref(),
            &ImageSource::Path(path.into()),
            render,
        )
        .await;
    }
    render(&app);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        app.refresh_speech();
        if line.trim().is_empty() {
            continue;
        }

        let command = match parse_command(&line) {
            Ok(command) => command,
            Err(e) => {
                warn!("{}", e);
                println!("{}", e);
                continue;
            }
        };

        match command {
            Command::Upload(path) => {
                if !app.is_upload_enabled() {
                    println!("Type 'reset' to return to the upload screen first.");
                    continue;
                }
                let source = ImageSource::Path(path);
                if !run_upload_with_progress(&mut app, provider.as_ref(), &source, render).await {
                    error!("Upload did not complete");
                }
            }
            Command::List => {}
            Command::Filter(tag) => app.dispatch(Action::ToggleFilter(tag)),
            Command::Open(position) => app.dispatch(Action::SelectRecipe(position)),
            Command::Close => app.dispatch(Action::CloseRecipe),
            Command::Read => app.dispatch(Action::ToggleReadAloud),
            Command::Add(arg) => {
                let item = resolve_item(&app, &arg);
                app.dispatch(Action::AddToShoppingList(item));
            }
            Command::Remove(item) => app.dispatch(Action::RemoveFromShoppingList(item)),
            Command::Shop => app.dispatch(Action::SwitchTab(Tab::ShoppingList)),
            Command::Clear => app.dispatch(Action::ClearShoppingList),
            Command::Tab(tab) => app.dispatch(Action::SwitchTab(tab)),
            Command::Reset => app.dispatch(Action::Reset),
            Command::Retry => app.dispatch(Action::Retry),
            Command::Help => {
                print_help();
                continue;
            }
            Command::Quit => break,
        }
        render(&app);
    }

    app.dispatch(Action::Unload);
    Ok(())
}
