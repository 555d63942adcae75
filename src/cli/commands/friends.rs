use super::{audit, open_store, signed_in};
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::friends::{FriendGraph, FriendIdentifier};
use crate::errors::AppResult;
use crate::ui::messages::{info, success};
use crate::utils::colors::{GREY, RESET};

pub async fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Friends { add, remove } = cmd else {
        return Ok(());
    };

    let store = open_store(cfg)?;
    let ctx = signed_in(&store).await?;
    let graph = FriendGraph::new(&store);

    if let Some(raw) = add {
        let friend = graph.add_friend(&ctx.user_id, &FriendIdentifier::parse(raw)?).await?;
        audit(&store, "friend_add", friend.as_str(), &format!("{} added {raw}", ctx.email));
        success(format!("{raw} is now your friend."));
        return Ok(());
    }

    if let Some(raw) = remove {
        match graph.remove_friend(&ctx.user_id, &FriendIdentifier::parse(raw)?).await? {
            Some(friend) => {
                audit(&store, "friend_remove", friend.as_str(), &format!("{} removed {raw}", ctx.email));
                success(format!("{raw} removed from your friends."));
            }
            None => info(format!("{raw} is not in your friends list.")),
        }
        return Ok(());
    }

    let friends = graph.friend_profiles(&ctx.user_id).await?;
    if friends.is_empty() {
        info("No friends yet. Add one with `repmax friends --add EMAIL`.");
        return Ok(());
    }

    println!("👥 Friends ({}):", friends.len());
    for f in friends {
        let email = if f.email.is_empty() {
            format!("{GREY}(account gone){RESET}")
        } else {
            f.email
        };
        println!("  {email}  {GREY}{}{RESET}", f.id);
    }
    Ok(())
}
