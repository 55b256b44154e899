//! Text commands accepted by the interactive runtime.
//!
//! One command per line, first word is the verb:
//!
//! ```text
//! type <text>              radius <km|all>          category <slug|all>
//! verification <status|all> urgency <level|all>     clear
//! more                     refresh                  fav <id>
//! donate <id> [need-index] contact <id>             wait <ms>
//! settle                   show
//! ```

use crate::app::Event;
use crate::domain::error::{DiscoveryError, Result};
use crate::domain::{Category, OrganizationId, Radius, Selection, Urgency, VerificationStatus};
use std::str::FromStr;

/// A parsed command line.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Type(String),
    Radius(Radius),
    Category(Selection<Category>),
    Verification(Selection<VerificationStatus>),
    Urgency(Selection<Urgency>),
    Clear,
    More,
    Refresh,
    Favorite(OrganizationId),
    Donate {
        id: OrganizationId,
        need_index: Option<usize>,
    },
    Contact(OrganizationId),
    /// Advance the virtual clock.
    Wait(u64),
    /// Run every scheduled completion.
    Settle,
    /// Render without changing anything.
    Show,
}

impl Command {
    /// The reducer event this command maps to, if it is not a runtime directive.
    #[must_use]
    pub fn into_event(self) -> Option<Event> {
        let event = match self {
            Self::Type(text) => Event::QueryChanged { text },
            Self::Radius(radius) => Event::RadiusSelected(radius),
            Self::Category(category) => Event::CategorySelected(category),
            Self::Verification(verification) => Event::VerificationSelected(verification),
            Self::Urgency(urgency) => Event::UrgencySelected(urgency),
            Self::Clear => Event::ClearFilters,
            Self::More => Event::LoadMore,
            Self::Refresh => Event::Refresh,
            Self::Favorite(id) => Event::ToggleFavorite { id },
            Self::Donate { id, need_index } => Event::DonateNow { id, need_index },
            Self::Contact(id) => Event::Contact { id },
            Self::Wait(_) | Self::Settle | Self::Show => return None,
        };
        Some(event)
    }
}

fn invalid(message: impl Into<String>) -> DiscoveryError {
    DiscoveryError::InvalidCommand(message.into())
}

fn required<'a>(arg: Option<&'a str>, usage: &str) -> Result<&'a str> {
    arg.filter(|a| !a.is_empty()).ok_or_else(|| invalid(format!("usage: {usage}")))
}

/// Parses `"all"` or a known enum value; unknown values are rejected.
fn selection<T: Copy + PartialEq>(value: &str, parse: fn(&str) -> T, unknown: T, kind: &str) -> Result<Selection<T>> {
    if value.eq_ignore_ascii_case("all") {
        return Ok(Selection::All);
    }
    let parsed = parse(value);
    if parsed == unknown {
        return Err(invalid(format!("unknown {kind}: {value}")));
    }
    Ok(Selection::Only(parsed))
}

impl FromStr for Command {
    type Err = DiscoveryError;

    fn from_str(line: &str) -> Result<Self> {
        let line = line.trim();
        let (verb, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let rest = rest.trim();
        let arg = (!rest.is_empty()).then_some(rest);

        match verb.to_ascii_lowercase().as_str() {
            "type" | "search" => Ok(Self::Type(rest.to_string())),
            "radius" => {
                let value = required(arg, "radius <km|all>")?;
                Radius::parse(value)
                    .map(Self::Radius)
                    .ok_or_else(|| invalid(format!("invalid radius: {value}")))
            }
            "category" => {
                let value = required(arg, "category <slug|all>")?;
                selection(value, Category::parse, Category::Unknown, "category").map(Self::Category)
            }
            "verification" => {
                let value = required(arg, "verification <status|all>")?;
                selection(value, VerificationStatus::parse, VerificationStatus::Unknown, "verification status")
                    .map(Self::Verification)
            }
            "urgency" => {
                let value = required(arg, "urgency <level|all>")?;
                selection(value, Urgency::parse, Urgency::Unknown, "urgency").map(Self::Urgency)
            }
            "clear" => Ok(Self::Clear),
            "more" => Ok(Self::More),
            "refresh" | "retry" => Ok(Self::Refresh),
            "fav" | "favorite" => Ok(Self::Favorite(OrganizationId::new(required(arg, "fav <id>")?))),
            "donate" => {
                let value = required(arg, "donate <id> [need-index]")?;
                let mut parts = value.split_whitespace();
                let id = parts.next().map(OrganizationId::new).ok_or_else(|| invalid("missing id"))?;
                let need_index = parts
                    .next()
                    .map(|index| index.parse::<usize>().map_err(|e| invalid(format!("invalid need index: {e}"))))
                    .transpose()?;
                Ok(Self::Donate { id, need_index })
            }
            "contact" => Ok(Self::Contact(OrganizationId::new(required(arg, "contact <id>")?))),
            "wait" => {
                let value = required(arg, "wait <ms>")?;
                value
                    .parse::<u64>()
                    .map(Self::Wait)
                    .map_err(|e| invalid(format!("invalid duration: {e}")))
            }
            "settle" => Ok(Self::Settle),
            "show" | "" => Ok(Self::Show),
            other => Err(invalid(format!("unknown command: {other}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str) -> Result<Command> {
        line.parse()
    }

    #[test]
    fn parses_filters() {
        assert_eq!(parse("radius 5").ok(), Some(Command::Radius(Radius::Km(5.0))));
        assert_eq!(parse("radius all").ok(), Some(Command::Radius(Radius::Unbounded)));
        assert_eq!(
            parse("category food-security").ok(),
            Some(Command::Category(Selection::Only(Category::FoodSecurity)))
        );
        assert_eq!(parse("urgency ALL").ok(), Some(Command::Urgency(Selection::All)));
    }

    #[test]
    fn type_keeps_inner_spaces_and_allows_empty() {
        assert_eq!(parse("type  clean water ").ok(), Some(Command::Type("clean water".to_string())));
        assert_eq!(parse("type").ok(), Some(Command::Type(String::new())));
    }

    #[test]
    fn donate_with_optional_need() {
        assert_eq!(
            parse("donate ngo-3 1").ok(),
            Some(Command::Donate {
                id: OrganizationId::new("ngo-3"),
                need_index: Some(1)
            })
        );
        assert!(matches!(parse("donate ngo-3 x"), Err(DiscoveryError::InvalidCommand(_))));
    }

    #[test]
    fn rejects_unknown_values() {
        assert!(parse("category space").is_err());
        assert!(parse("radius far").is_err());
        assert!(parse("fly away").is_err());
        assert!(parse("fav").is_err());
    }

    #[test]
    fn directives_have_no_event() {
        assert_eq!(Command::Wait(300).into_event(), None);
        assert_eq!(Command::More.into_event(), Some(Event::LoadMore));
    }
}
