use anyhow::{Context, Result};
use clap::Args;
use codemig_core::Recipe;
use codemig_core::recipe::builtin_source;
use colored::Colorize;

#[derive(Args, Debug, Default, Clone)]
#[command(about = "List built-in recipes")]
pub struct RecipesArgs {}

#[derive(Args, Debug, Clone)]
#[command(about = "Print the TOML of a built-in recipe")]
pub struct ShowArgs {
    /// Built-in recipe name
    #[arg(value_name = "RECIPE")]
    pub recipe: String,
}

pub fn execute_list(_args: RecipesArgs) -> Result<()> {
    let recipes = Recipe::builtins().context("Failed to load built-in recipes")?;
    let width = recipes.iter().map(|r| r.name().len()).max().unwrap_or(0);
    for recipe in &recipes {
        let suffix = recipe
            .suffix()
            .map(|s| format!(" (*{s})").dimmed().to_string())
            .unwrap_or_default();
        let name = format!("{:<width$}", recipe.name());
        println!("{}  {}{suffix}", name.bold(), recipe.description());
    }
    Ok(())
}

pub fn execute_show(args: ShowArgs) -> Result<()> {
    let source = builtin_source(&args.recipe).with_context(|| {
        let known = codemig_core::recipe::builtin_names()
            .collect::<Vec<_>>()
            .join(", ");
        format!("Unknown recipe `{}` (built-in recipes: {known})", args.recipe)
    })?;
    print!("{source}");
    Ok(())
}
