use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use argh::FromArgs;
use bag_of_holding::{Bag, Conjure, Error as BagError, RandomSource, parse_gift_message, response};
use irc::proto::ChannelExt;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, info};

use super::prelude::*;
use crate::storage::{self, BagStore};

/// The prefix of a CTCP `ACTION` message, i.e. `/me`.
const CTCP_ACTION: &str = "\x01ACTION ";

/// Usage text for the optional channel argument every command accepts.
const CHANNEL_USAGE: &str = "[<channel>]";

/// Combine items from the bag into something new
#[derive(FromArgs, Debug)]
struct CombineOpts {
    /// how many items to combine
    #[argh(positional)]
    count: i64,
}

/// A parsed command along with the channel whose bag it applies to, if one was named.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation<'a> {
    /// The channel named before the command's arguments.
    pub channel: Option<&'a str>,
    /// What to do with the bag.
    pub request: Request<'a>,
}

impl<'a> Invocation<'a> {
    const fn new(channel: Option<&'a str>, request: Request<'a>) -> Invocation<'a> {
        Invocation { channel, request }
    }
}

/// A command the plugin understood.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request<'a> {
    /// Put something in the bag.
    Hold(&'a str),
    /// Show a random item.
    Random,
    /// Hit someone with a random item.
    Hit(&'a str),
    /// Turn a random item into something else.
    Transmogrify,
    /// Combine a number of random items.
    Combine(usize),
    /// Show the weight of the bag.
    Weight,
    /// Bring something back from the history.
    Conjure,
    /// Take a specific item out of the bag.
    Drop(&'a str),
    /// The command was used wrong; reply with the usage text.
    Usage(String),
}

/// What to send back to the channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// A plain message.
    Say(String),
    /// A `/me` message.
    Act(String),
    /// A plain message flagged as an error.
    Error(String),
}

impl Reply {
    /// Sends the reply to `target`.
    ///
    /// # Errors
    ///
    /// Returns an error if the message could not be sent.
    pub fn send(&self, outbox: &dyn Outbox, target: &str) -> Result<(), PluginError> {
        match self {
            Reply::Say(text) => outbox.say(target, text),
            Reply::Act(text) => outbox.act(target, text),
            Reply::Error(text) => outbox.say(target, &format!("Error: {text}")),
        }
    }
}

/// The command triggers the plugin reacts to.
struct Commands {
    hold: BotCommand,
    random: BotCommand,
    hit: BotCommand,
    transmogrify: BotCommand,
    combine: BotCommand,
    weight: BotCommand,
    conjure: BotCommand,
    drop: BotCommand,
}

impl Commands {
    fn new(prefix: &str) -> Commands {
        Commands {
            hold: BotCommand::new(prefix, "hold"),
            random: BotCommand::new(prefix, "random"),
            hit: BotCommand::new(prefix, "hit"),
            transmogrify: BotCommand::new(prefix, "transmogrify"),
            combine: BotCommand::new(prefix, "combine"),
            weight: BotCommand::new(prefix, "weight"),
            conjure: BotCommand::new(prefix, "conjure"),
            drop: BotCommand::new(prefix, "drop"),
        }
    }

    fn parse<'a>(&self, text: &'a str) -> Option<Invocation<'a>> {
        let invocation = if let Some(args) = self.hold.parse(text) {
            let (channel, args) = channel_arg(args);

            Invocation::new(channel, with_text(args, Request::Hold, &self.hold, "<thing>"))
        } else if let Some(args) = self.random.parse(text) {
            Invocation::new(channel_arg(args).0, Request::Random)
        } else if let Some(args) = self.hit.parse(text) {
            let (channel, args) = channel_arg(args);

            Invocation::new(channel, with_text(args, Request::Hit, &self.hit, "<target>"))
        } else if let Some(args) = self.transmogrify.parse(text) {
            Invocation::new(channel_arg(args).0, Request::Transmogrify)
        } else if let Some(args) = self.combine.parse(text) {
            let (channel, args) = channel_arg(args);

            Invocation::new(channel, self.parse_combine(args))
        } else if let Some(args) = self.weight.parse(text) {
            Invocation::new(channel_arg(args).0, Request::Weight)
        } else if let Some(args) = self.conjure.parse(text) {
            Invocation::new(channel_arg(args).0, Request::Conjure)
        } else if let Some(args) = self.drop.parse(text) {
            let (channel, args) = channel_arg(args);

            Invocation::new(channel, with_text(args, Request::Drop, &self.drop, "<thing>"))
        } else {
            return None;
        };

        Some(invocation)
    }

    fn parse_combine(&self, args: &str) -> Request<'static> {
        let trigger = self.combine.trigger();
        let Some(sub_args) = shlex::split(args) else {
            return Request::Usage(format!("Usage: {trigger} {CHANNEL_USAGE} <number>"));
        };
        // Everything after `--` is positional, so negative counts aren't taken for flags.
        let sub_args_ref = std::iter::once("--")
            .chain(sub_args.iter().map(String::as_str))
            .collect::<Vec<_>>();

        match CombineOpts::from_args(&[trigger], &sub_args_ref) {
            // Negative counts are below the minimum, same as zero.
            Ok(opts) => Request::Combine(usize::try_from(opts.count).unwrap_or(0)),
            Err(err) => Request::Usage(err.output.trim_end().to_string()),
        }
    }
}

/// Splits a leading channel name off `args`.
fn channel_arg(args: &str) -> (Option<&str>, &str) {
    let args = args.trim_start();
    let (first, rest) = args.split_once(char::is_whitespace).unwrap_or((args, ""));

    if first.is_channel_name() {
        (Some(first), rest)
    } else {
        (None, args)
    }
}

/// Builds a request that takes free text, or a usage reply if the text is blank.
fn with_text<'a>(
    args: &'a str,
    request: fn(&'a str) -> Request<'a>,
    command: &BotCommand,
    usage: &str,
) -> Request<'a> {
    let args = args.trim();

    if args.is_empty() {
        Request::Usage(format!(
            "Usage: {} {CHANNEL_USAGE} {usage}",
            command.trigger()
        ))
    } else {
        request(args)
    }
}

/// Returns the text of a CTCP `ACTION` message.
fn action_text(text: &str) -> Option<&str> {
    let text = text.strip_prefix(CTCP_ACTION)?;

    Some(text.strip_suffix('\x01').unwrap_or(text))
}

/// A bag of holding for every channel.
pub struct BagOfHolding {
    /// The command triggers
    commands: Commands,
    /// Random source for every decision the bag makes
    rng: Mutex<StdRng>,
    /// One lock per channel, held while its bag is loaded, changed and saved
    locks: Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>,
}

#[async_trait]
impl Plugin<Context> for BagOfHolding {
    fn new(ctx: &Context) -> BagOfHolding {
        let seed = ctx.config.bag.seed.unwrap_or_else(rand::random);

        BagOfHolding::with_seed(&ctx.config.bag.prefix, seed)
    }

    fn name() -> Name {
        Name::from("bag_of_holding")
    }

    fn author() -> Author {
        Author::from("Mikkel Kroman <mk@maero.dk>")
    }

    fn version() -> Version {
        Version::from("0.1")
    }

    async fn handle_message(
        &self,
        ctx: &Context,
        outbox: &dyn Outbox,
        message: &Message,
    ) -> Result<(), PluginError> {
        let Command::PRIVMSG(ref target, ref text) = message.command else {
            return Ok(());
        };
        let in_channel = target.is_channel_name();

        // Gifts only count when handed over in front of a channel.
        if !in_channel && action_text(text).is_some() {
            return Ok(());
        }

        let Some(reply_to) = message.response_target() else {
            return Ok(());
        };
        let Some(Invocation { channel, request }) = self.parse(text, outbox.nickname()) else {
            return Ok(());
        };
        let channel = channel.or_else(|| in_channel.then_some(target.as_str()));

        debug!(?channel, %reply_to, ?request, "handling bag request");

        let reply = match (request, channel) {
            (Request::Usage(usage), _) => Reply::Say(usage),
            (_, None) => Reply::Error("name a channel to use its bag from here".to_string()),
            (request, Some(channel)) => {
                let capacity = ctx.config.capacity_for(channel);

                self.execute(ctx.store.as_ref(), channel, capacity, request)
                    .await
                    .map_err(PluginError::plugin)?
            }
        };

        reply.send(outbox, reply_to)
    }
}

impl BagOfHolding {
    /// Creates the plugin with commands starting with `prefix` and a random source seeded with
    /// `seed`.
    #[must_use]
    pub fn with_seed(prefix: &str, seed: u64) -> BagOfHolding {
        BagOfHolding {
            commands: Commands::new(prefix),
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
            locks: Mutex::new(HashMap::new()),
        }
    }

    /// Parses a message into a request. Actions that hand something to `nickname` are requests
    /// to hold it.
    ///
    /// Commands may name a channel before their arguments, e.g. `.weight #games`, to use that
    /// channel's bag instead of the one they're sent to.
    #[must_use]
    pub fn parse<'a>(&self, text: &'a str, nickname: &str) -> Option<Invocation<'a>> {
        match action_text(text) {
            Some(action) => parse_gift_message(action, nickname)
                .map(|item| Invocation::new(None, Request::Hold(item))),
            None => self.commands.parse(text),
        }
    }

    /// Performs `request` on the bag of `channel` and returns the reply.
    ///
    /// The bag is saved only if the request changed it. Requests for the same channel are
    /// serialized.
    ///
    /// # Errors
    ///
    /// Returns an error if the bag could not be loaded or saved. Nothing is replied in that case.
    pub async fn execute(
        &self,
        store: &dyn BagStore,
        channel: &str,
        capacity: usize,
        request: Request<'_>,
    ) -> Result<Reply, storage::Error> {
        let lock = self.channel_lock(channel);
        let _guard = lock.lock().await;

        let mut bag = Bag::new(store.load(channel).await?, capacity);
        let (reply, changed) = {
            let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);

            apply(&mut bag, request, &mut *rng)
        };

        if changed {
            store.save(channel, bag.inventory()).await?;
            info!(%channel, items = bag.len(), weight = bag.weight(), "saved bag");
        }

        Ok(reply)
    }

    fn channel_lock(&self, channel: &str) -> Arc<tokio::sync::Mutex<()>> {
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);

        locks.entry(storage::channel_key(channel)).or_default().clone()
    }
}

/// Applies `request` to `bag` and returns the reply along with whether the bag changed.
fn apply(bag: &mut Bag, request: Request<'_>, rng: &mut impl RandomSource) -> (Reply, bool) {
    match request {
        Request::Hold(item) => {
            let dropped = bag.add(item, rng);

            (Reply::Act(response::picked_up(item, &dropped)), true)
        }
        Request::Random => match bag.pick_random(rng) {
            Ok(item) => (Reply::Say(item.to_string()), false),
            Err(err) => (Reply::Error(err.to_string()), false),
        },
        Request::Hit(target) => match bag.pick_random(rng) {
            Ok(item) => {
                let item = item.to_string();

                (Reply::Act(response::hit(target, &item, rng)), false)
            }
            Err(err) => (Reply::Error(err.to_string()), false),
        },
        Request::Transmogrify => match bag.transmogrify(rng) {
            Ok(result) => {
                let line = response::derived(&result.result, &result.consumed);

                (Reply::Say(response::but_dropped(&line, &result.dropped)), true)
            }
            Err(_) => (Reply::Act(response::empty_transmogrify().to_string()), false),
        },
        Request::Combine(count) => match bag.combine(count, rng) {
            Ok(result) => {
                let line = response::combined(&result.consumed, &result.result);

                (Reply::Act(response::but_dropped(&line, &result.dropped)), true)
            }
            Err(err) => (Reply::Error(err.to_string()), false),
        },
        Request::Weight => (Reply::Say(bag.weight().to_string()), false),
        Request::Conjure => match bag.conjure(rng) {
            Ok(Conjure::Conjured { item, dropped }) => {
                let line = response::conjured(&item, rng);

                (Reply::Act(response::but_dropped(&line, &dropped)), true)
            }
            Ok(Conjure::Full) | Err(BagError::EmptyHistory) => {
                (Reply::Act(response::conjure_failed(rng).to_string()), false)
            }
            Err(err) => (Reply::Error(err.to_string()), false),
        },
        Request::Drop(item) => {
            if bag.remove_specific(item) {
                (Reply::Act(response::dropped(item)), true)
            } else {
                (Reply::Error(format!("I don't have {item}.")), false)
            }
        }
        Request::Usage(usage) => (Reply::Say(usage), false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plugin() -> BagOfHolding {
        BagOfHolding::with_seed(".", 42)
    }

    /// Parses `text` and returns only the request.
    fn request<'a>(plugin: &BagOfHolding, text: &'a str) -> Option<Request<'a>> {
        plugin.parse(text, "bot").map(|invocation| invocation.request)
    }

    #[test]
    fn it_should_parse_commands() {
        let plugin = plugin();

        assert_eq!(request(&plugin, ".hold a lamp"), Some(Request::Hold("a lamp")));
        assert_eq!(request(&plugin, ".random"), Some(Request::Random));
        assert_eq!(request(&plugin, ".hit  alice "), Some(Request::Hit("alice")));
        assert_eq!(request(&plugin, ".transmogrify"), Some(Request::Transmogrify));
        assert_eq!(request(&plugin, ".combine 3"), Some(Request::Combine(3)));
        assert_eq!(request(&plugin, ".weight"), Some(Request::Weight));
        assert_eq!(request(&plugin, ".conjure"), Some(Request::Conjure));
        assert_eq!(request(&plugin, ".drop a lamp"), Some(Request::Drop("a lamp")));
        assert_eq!(request(&plugin, "hello there"), None);
        assert_eq!(request(&plugin, ".holdings"), None);
    }

    #[test]
    fn it_should_parse_channel_argument() {
        let plugin = plugin();

        assert_eq!(
            plugin.parse(".weight #games", "bot"),
            Some(Invocation::new(Some("#games"), Request::Weight))
        );
        assert_eq!(
            plugin.parse(".hold #games a brass lamp", "bot"),
            Some(Invocation::new(Some("#games"), Request::Hold("a brass lamp")))
        );
        assert_eq!(
            plugin.parse(".combine #games 2", "bot"),
            Some(Invocation::new(Some("#games"), Request::Combine(2)))
        );
        assert_eq!(
            plugin.parse(".hold a brass lamp", "bot"),
            Some(Invocation::new(None, Request::Hold("a brass lamp")))
        );
        assert_eq!(
            request(&plugin, ".hold #games"),
            Some(Request::Usage(
                "Usage: .hold [<channel>] <thing>".to_string()
            ))
        );
    }

    #[test]
    fn negative_combine_counts_are_below_minimum() {
        let plugin = plugin();

        assert_eq!(request(&plugin, ".combine -1"), Some(Request::Combine(0)));
        assert_eq!(request(&plugin, ".combine 0"), Some(Request::Combine(0)));
    }

    #[test]
    fn it_should_reply_with_usage() {
        let plugin = plugin();

        assert_eq!(
            request(&plugin, ".hold"),
            Some(Request::Usage("Usage: .hold [<channel>] <thing>".to_string()))
        );
        assert_eq!(
            request(&plugin, ".hit   "),
            Some(Request::Usage("Usage: .hit [<channel>] <target>".to_string()))
        );
        assert!(matches!(
            request(&plugin, ".combine many"),
            Some(Request::Usage(_))
        ));
        assert!(matches!(request(&plugin, ".combine"), Some(Request::Usage(_))));
        assert!(matches!(
            request(&plugin, ".combine \"3"),
            Some(Request::Usage(_))
        ));
    }

    #[test]
    fn it_should_parse_gifts() {
        let plugin = plugin();

        assert_eq!(
            request(&plugin, "\x01ACTION hands Bot a rusty key\x01"),
            Some(Request::Hold("a rusty key"))
        );
        assert_eq!(
            request(&plugin, "\x01ACTION hands someone a rusty key\x01"),
            None
        );
        // A gift isn't a command, even if it looks like one.
        assert_eq!(request(&plugin, "\x01ACTION .weight\x01"), None);
    }

    #[test]
    fn action_text_without_trailing_delimiter() {
        assert_eq!(action_text("\x01ACTION waves"), Some("waves"));
        assert_eq!(action_text("waves"), None);
    }

    #[test]
    fn apply_reports_missing_drop() {
        let mut bag = Bag::empty(0);
        let mut rng = StdRng::seed_from_u64(1);

        assert_eq!(
            apply(&mut bag, Request::Drop("a lamp"), &mut rng),
            (Reply::Error("I don't have a lamp.".to_string()), false)
        );
    }
}
