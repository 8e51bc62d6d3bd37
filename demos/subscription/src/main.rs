//! A feed view that subscribes to one channel at a time. Switching channels
//! cancels the old subscription before opening the new one, and closing the
//! view cancels whatever is still open.

use std::cell::RefCell;
use std::rc::Rc;

use cleared_memo::{Options, RenderHook, cleared_memo, deps};

#[derive(Default)]
struct Feed {
    next_id: u64,
    open: Vec<(u64, String)>,
}

#[derive(Clone, Debug)]
struct Subscription {
    id: u64,
    channel: String,
}

impl Feed {
    fn subscribe(&mut self, channel: &str) -> Subscription {
        self.next_id += 1;
        self.open.push((self.next_id, channel.to_string()));
        log::info!("subscribed #{} to {channel}", self.next_id);
        Subscription {
            id: self.next_id,
            channel: channel.to_string(),
        }
    }

    fn unsubscribe(&mut self, sub: &Subscription) {
        self.open.retain(|(id, _)| *id != sub.id);
        log::info!("unsubscribed #{} from {}", sub.id, sub.channel);
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let strict = std::env::args().any(|a| a == "--strict");
    let feed = Rc::new(RefCell::new(Feed::default()));

    let mut view = RenderHook::with_options(
        Options::default().strict_effects(strict),
        "news".to_string(),
        {
            let feed = feed.clone();
            move |channel: &String| {
                let (sub_feed, unsub_feed) = (feed.clone(), feed.clone());
                let channel = channel.clone();
                cleared_memo(
                    {
                        let channel = channel.clone();
                        move || sub_feed.borrow_mut().subscribe(&channel)
                    },
                    move |sub| unsub_feed.borrow_mut().unsubscribe(&sub),
                    deps![channel],
                    None,
                )
            }
        },
    )?;

    for channel in ["news", "sports", "sports", "weather"] {
        let sub = view.rerender(channel.to_string())?;
        log::info!("rendering #{} ({})", sub.id, sub.channel);
    }

    view.unmount();
    let open = feed.borrow().open.len();
    log::info!("view closed; {open} subscriptions left open");
    Ok(())
}
