// In-chat commands. Anything not starting with ':' is a search.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatCommand {
    Search(String),
    /// Search again with the pending input buffer
    Send,
    Voice,
    Stop,
    Recipes,
    /// 1-based position in the current results
    View(usize),
    /// 1-based recipe position and ingredient position
    Add { recipe: usize, ingredient: usize },
    History,
    HistoryRemove(i64),
    Shop,
    ShopRemove(String),
    Help,
    Quit,
    Invalid(String),
}

pub fn parse(line: &str) -> ChatCommand {
    let trimmed = line.trim();
    let Some(command) = trimmed.strip_prefix(':') else {
        return ChatCommand::Search(line.to_string());
    };

    let mut words = command.split_whitespace();
    let name = words.next().unwrap_or_default().to_lowercase();
    let rest: Vec<&str> = words.collect();

    match (name.as_str(), rest.as_slice()) {
        ("send", []) => ChatCommand::Send,
        ("voice", []) => ChatCommand::Voice,
        ("stop", []) => ChatCommand::Stop,
        ("recipes", []) => ChatCommand::Recipes,
        ("view", [n]) => match parse_position(n) {
            Some(n) => ChatCommand::View(n),
            None => invalid("Usage: :view <recipe number>"),
        },
        ("add", [r, i]) => match (parse_position(r), parse_position(i)) {
            (Some(recipe), Some(ingredient)) => ChatCommand::Add { recipe, ingredient },
            _ => invalid("Usage: :add <recipe number> <ingredient number>"),
        },
        ("history", []) => ChatCommand::History,
        ("history", ["rm", id]) => match id.parse::<i64>() {
            Ok(id) => ChatCommand::HistoryRemove(id),
            Err(_) => invalid("Usage: :history rm <recipe id>"),
        },
        ("shop", []) => ChatCommand::Shop,
        ("shop", ["rm", item @ ..]) if !item.is_empty() => ChatCommand::ShopRemove(item.join(" ")),
        ("help", _) => ChatCommand::Help,
        ("quit", _) | ("exit", _) => ChatCommand::Quit,
        _ => invalid(&format!("Unknown command: {}. Type :help for commands.", trimmed)),
    }
}

fn parse_position(word: &str) -> Option<usize> {
    word.parse::<usize>().ok().filter(|n| *n > 0)
}

fn invalid(message: &str) -> ChatCommand {
    ChatCommand::Invalid(message.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_is_search() {
        assert_eq!(parse("pasta"), ChatCommand::Search("pasta".to_string()));
        assert_eq!(parse("   "), ChatCommand::Search("   ".to_string()));
    }

    #[test]
    fn test_simple_commands() {
        assert_eq!(parse(":send"), ChatCommand::Send);
        assert_eq!(parse(":voice"), ChatCommand::Voice);
        assert_eq!(parse(" :STOP "), ChatCommand::Stop);
        assert_eq!(parse(":recipes"), ChatCommand::Recipes);
        assert_eq!(parse(":history"), ChatCommand::History);
        assert_eq!(parse(":shop"), ChatCommand::Shop);
        assert_eq!(parse(":exit"), ChatCommand::Quit);
        assert_eq!(parse(":help me"), ChatCommand::Help);
    }

    #[test]
    fn test_positions_are_one_based() {
        assert_eq!(parse(":view 2"), ChatCommand::View(2));
        assert!(matches!(parse(":view 0"), ChatCommand::Invalid(_)));
        assert_eq!(
            parse(":add 1 3"),
            ChatCommand::Add {
                recipe: 1,
                ingredient: 3
            }
        );
        assert!(matches!(parse(":add 1"), ChatCommand::Invalid(_)));
    }

    #[test]
    fn test_removals() {
        assert_eq!(parse(":history rm 715538"), ChatCommand::HistoryRemove(715538));
        assert!(matches!(parse(":history rm x"), ChatCommand::Invalid(_)));
        assert_eq!(
            parse(":shop rm olive oil"),
            ChatCommand::ShopRemove("olive oil".to_string())
        );
        assert!(matches!(parse(":shop rm"), ChatCommand::Invalid(_)));
    }

    #[test]
    fn test_unknown_command() {
        assert!(matches!(parse(":dance"), ChatCommand::Invalid(_)));
    }
}
