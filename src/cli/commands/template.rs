use super::{audit, open_store, signed_in};
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::templates::TemplateBook;
use crate::errors::AppResult;
use crate::models::TemplateId;
use crate::ui::messages::{info, success};
use crate::utils::colors::{GREY, RESET};

pub async fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Template {
        add,
        exercises,
        list: _,
        delete,
    } = cmd
    else {
        return Ok(());
    };

    let store = open_store(cfg)?;
    let ctx = signed_in(&store).await?;
    let book = TemplateBook::new(&store, &ctx.user_id);

    if let Some(name) = add {
        let t = book.create(name, exercises).await?;
        audit(&store, "template_saved", t.id.as_str(), &format!("Template '{}' saved", t.name));
        success(format!("Template '{}' saved (id {}).", t.name, t.id));
        return Ok(());
    }

    if let Some(id) = delete {
        let id = TemplateId::from(id.trim());
        book.delete(&id).await?;
        audit(&store, "template_deleted", id.as_str(), "Template deleted");
        success(format!("Template {id} deleted."));
        return Ok(());
    }

    // --list, and the default
    let templates = book.list().await?;
    if templates.is_empty() {
        info("No templates yet. Save one with `repmax template --add NAME EXERCISE...`.");
        return Ok(());
    }
    for t in templates {
        println!("📋 {}  {GREY}{}{RESET}", t.name, t.id);
        println!("   {}", t.exercises.join(", "));
    }
    Ok(())
}
