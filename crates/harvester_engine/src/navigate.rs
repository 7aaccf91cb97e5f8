//! Opening screens: home feed, profiles, posts, hashtag and location feeds.
use engine_logging::{engine_info, engine_warn};
use harvester_core::link;

use crate::bot::Bot;
use crate::catalog::{classes, ids};
use crate::device::Device;
use crate::error::BotError;
use crate::pacer::Pacer;
use crate::types::Selector;

/// Deep links are re-sent this many times while the feed tabs stay hidden.
const LINK_ATTEMPTS: usize = 3;

/// Tab of a hashtag or location feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FeedTab {
    Top,
    #[default]
    Recent,
}

impl FeedTab {
    pub fn label(self) -> &'static str {
        match self {
            FeedTab::Top => "Top",
            FeedTab::Recent => "Recent",
        }
    }
}

impl<D: Device, P: Pacer> Bot<D, P> {
    pub fn open_home_feed(&mut self) -> Result<bool, BotError> {
        self.attempt("open home feed", |bot| {
            engine_info!("Opening home feed");
            bot.reset_app()?;
            let home = bot.catalog.id(ids::TAB_ICON).nth(0);
            bot.device.click(&home, bot.settings.element_timeout())?;
            bot.device.click(&home, bot.settings.element_timeout())?;
            Ok(true)
        })
    }

    /// Opens `username`'s profile, and its first post when `open_first_post`.
    ///
    /// `false` when the profile did not show up or has no posts.
    pub fn open_profile(&mut self, username: &str, open_first_post: bool) -> Result<bool, BotError> {
        self.attempt("open profile", |bot| bot.visit_profile(username, open_first_post))
    }

    pub(crate) fn visit_profile(
        &mut self,
        username: &str,
        open_first_post: bool,
    ) -> Result<bool, BotError> {
        let url = link::profile(username)?;
        self.reset_app()?;
        self.open_link(&url)?;
        self.idle();

        let title = self.device.query(self.catalog.id(ids::ACTION_BAR_TITLE)).text()?;
        if title != username {
            engine_warn!("expected profile {username}, landed on {title:?}");
            return Ok(false);
        }
        if !open_first_post {
            return Ok(true);
        }

        self.idle();
        let first_row = self.catalog.id(ids::MEDIA_GRID_ROW).nth(0);
        let thumbs = self
            .device
            .children(&first_row, &Selector::class_name(classes::IMAGE_VIEW))?;
        match thumbs.first() {
            Some(thumb) => {
                self.device.click_at(thumb.bounds.center())?;
                Ok(true)
            }
            None => {
                engine_warn!("{username} has no posts");
                Ok(false)
            }
        }
    }

    /// Opens a post by its short code (the `B_qh-EYnrjW` in `/p/B_qh-EYnrjW/`).
    pub fn open_post(&mut self, code: &str) -> Result<bool, BotError> {
        self.attempt("open post", |bot| {
            let url = link::post(code)?;
            bot.open_link(&url)?;
            bot.idle();
            let frames = bot.device.children(
                &Selector::resource_id(ids::SYSTEM_LIST),
                &Selector::class_name(classes::FRAME_LAYOUT),
            )?;
            Ok(frames.len() >= 2)
        })
    }

    /// Opens the hashtag feed on `tab`, then its first post once the media
    /// count header is up.
    pub fn open_hashtag(&mut self, tag: &str, tab: FeedTab) -> Result<bool, BotError> {
        self.attempt("open hashtag", |bot| {
            let url = link::hashtag(tag)?;
            bot.reset_app()?;
            let tab_label = Selector::text(tab.label());
            let mut shown = false;
            for _ in 0..LINK_ATTEMPTS {
                bot.open_link(&url)?;
                if bot.device.wait_exists(&tab_label, bot.settings.tab_timeout())? {
                    shown = true;
                    break;
                }
            }
            if !shown {
                engine_warn!("#{tag} never showed its {} tab", tab.label());
                return Ok(false);
            }

            bot.device.click(&tab_label, bot.settings.element_timeout())?;
            bot.idle();
            if bot.device.exists(&bot.catalog.id(ids::HASHTAG_MEDIA_COUNT))? {
                bot.device.click(
                    &bot.catalog.id(ids::FIRST_GRID_IMAGE),
                    bot.settings.element_timeout(),
                )?;
            }
            Ok(true)
        })
    }

    /// Opens a location feed, optionally switching to `tab`, then its first post.
    pub fn open_location(&mut self, code: &str, tab: Option<FeedTab>) -> Result<bool, BotError> {
        self.attempt("open location", |bot| {
            let url = link::location(code)?;
            bot.reset_app()?;
            bot.open_link(&url)?;
            bot.idle();
            if let Some(tab) = tab {
                let tab_label = Selector::text(tab.label());
                if !bot.device.wait_exists(&tab_label, bot.settings.tab_timeout())? {
                    engine_warn!("location {code} never showed its {} tab", tab.label());
                    return Ok(false);
                }
                bot.device.click(&tab_label, bot.settings.element_timeout())?;
            }
            bot.idle();
            bot.device.click(
                &bot.catalog.id(ids::FIRST_GRID_IMAGE),
                bot.settings.element_timeout(),
            )?;
            Ok(true)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::FeedTab;

    #[test]
    fn hashtag_feeds_default_to_recent() {
        assert_eq!(FeedTab::default(), FeedTab::Recent);
        assert_eq!(FeedTab::Top.label(), "Top");
    }
}
