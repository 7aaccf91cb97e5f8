//! Single-shot and bounded actions: likes, follows, saves, session logout.
use std::time::Duration;

use chrono::Local;
use engine_logging::{engine_info, engine_warn};
use harvester_core::LoopView;

use crate::bot::Bot;
use crate::catalog::{classes, ids, texts};
use crate::device::Device;
use crate::error::BotError;
use crate::interact::{run_bounded, FeedLikes};
use crate::pacer::Pacer;
use crate::types::{Point, ScrollAxis, Selector};

const FOLLOW_CLICKS: usize = 3;
const SAVE_HOLD: Duration = Duration::from_secs(3);
/// Login Activity rarely lists more; stops a stuck screen from looping forever.
const MAX_SESSION_LOGOUTS: usize = 50;
/// Position of the menu icon among the images of a session row.
const SESSION_MENU_ICON: usize = 1;
/// Position of the first other-device session among the list rows.
const OTHER_SESSION_ROW: usize = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaType {
    Photo,
    Video,
    Carousel,
}

impl<D: Device, P: Pacer> Bot<D, P> {
    /// Likes posts on the open feed until `amount` count.
    ///
    /// Ends with [`BotError::RateLimited`] as soon as the "Try Again Later"
    /// dialog shows up; no further action is taken after that.
    pub fn like_up_to(&mut self, amount: u32) -> Result<LoopView, BotError> {
        self.guard(|bot| {
            let mut likes = FeedLikes::new(&bot.device, &bot.catalog, bot.settings.element_timeout());
            run_bounded(
                amount,
                &mut likes,
                bot.settings.like_pause,
                &mut bot.pacer,
                &mut bot.rng,
            )
        })
    }

    pub fn follow(&mut self, username: &str) -> Result<bool, BotError> {
        self.attempt("follow", |bot| {
            if !bot.visit_profile(username, false)? {
                return Ok(false);
            }
            let follow = Selector::text(texts::FOLLOW);
            for _ in 0..FOLLOW_CLICKS {
                if !bot.device.exists(&follow)? {
                    break;
                }
                bot.device.click(&follow, bot.settings.element_timeout())?;
            }
            let following = bot.device.exists(&Selector::text(texts::FOLLOWING))?;
            if following {
                engine_info!("Following {username}");
            }
            Ok(following)
        })
    }

    /// Unfollows through the own following list, which avoids opening the
    /// profile. `false` unless the search narrows down to exactly one row.
    pub fn unfollow(&mut self, username: &str) -> Result<bool, BotError> {
        self.attempt("unfollow", |bot| {
            engine_info!("Unfollowing {username}");
            bot.open_own_profile()?;
            bot.device.click(
                &bot.catalog.id(ids::FOLLOWING_CONTAINER),
                bot.settings.element_timeout(),
            )?;
            bot.idle();
            bot.device
                .send_keys(&bot.catalog.id(ids::SEARCH_FIELD), username)?;
            bot.idle();

            let button = bot.device.query(bot.catalog.id(ids::BUTTON));
            if button.count()? != 1 {
                return Ok(false);
            }
            if button.text()? == texts::FOLLOWING {
                button.click(bot.settings.element_timeout())?;
            }
            Ok(button.text()? == texts::FOLLOW)
        })
    }

    /// Saves the first post of `username` into `collection`, creating the
    /// collection when it does not exist. Defaults to today's date.
    pub fn save(&mut self, username: &str, collection: Option<&str>) -> Result<bool, BotError> {
        let collection = collection
            .map(str::to_string)
            .unwrap_or_else(|| Local::now().date_naive().to_string());
        self.attempt("save", |bot| {
            if !bot.visit_profile(username, false)? {
                return Ok(false);
            }
            let grid = bot.catalog.id(ids::PROFILE_VIEWPAGER);
            let thumbs = bot
                .device
                .children(&grid, &Selector::class_name(classes::IMAGE_VIEW))?;
            let Some(first) = thumbs.first() else {
                engine_warn!("{username} has nothing to save");
                return Ok(false);
            };
            bot.device.click_at(first.bounds.center())?;
            bot.idle();
            bot.device
                .long_click(&bot.catalog.id(ids::FEED_SAVE_BUTTON), SAVE_HOLD)?;

            let names = bot.catalog.id(ids::COLLECTION_NAME);
            if !bot.device.exists(&names)? {
                return Ok(false);
            }
            if bot.pick_collection(&collection)? {
                engine_info!("Saved {username} to {collection}");
                return Ok(true);
            }

            let timeout = bot.settings.element_timeout();
            bot.device
                .click(&bot.catalog.id(ids::NEW_COLLECTION), timeout)?;
            bot.idle();
            bot.device
                .send_keys(&bot.catalog.id(ids::NEW_COLLECTION_NAME), &collection)?;
            bot.device
                .click(&bot.catalog.id(ids::SAVE_TO_COLLECTION), timeout)?;
            engine_info!("Saved {username} to new collection {collection}");
            Ok(true)
        })
    }

    /// Walks the collection carousel sideways until `name` shows up or the
    /// last visible collection stops changing.
    fn pick_collection(&mut self, name: &str) -> Result<bool, BotError> {
        let target = Selector::text(name);
        let names = self.catalog.id(ids::COLLECTION_NAME);
        let thumbs = self.catalog.id(ids::COLLECTION_THUMB);
        let mut last_seen: Option<String> = None;
        loop {
            if self.device.exists(&target)? {
                self.device.click(&target, self.settings.element_timeout())?;
                return Ok(true);
            }
            let last = self.device.query(names.clone()).texts()?.pop();
            if last.is_none() || last == last_seen {
                return Ok(false);
            }
            last_seen = last;

            let visible = self.device.elements(&thumbs)?;
            if visible.len() <= 2 {
                return Ok(false);
            }
            if let (Some(first), Some(last)) = (visible.first(), visible.last()) {
                if let Some(gesture) =
                    self.device
                        .compute_scroll_vector(&first.bounds, &last.bounds, ScrollAxis::Horizontal)
                {
                    self.device.swipe(&gesture)?;
                }
            }
        }
    }

    /// Logs out every other device listed under Login Activity and returns
    /// how many were logged out.
    pub fn logout_other_sessions(&mut self) -> Result<usize, BotError> {
        self.guard(|bot| {
            bot.open_own_profile()?;
            let timeout = bot.settings.element_timeout();
            bot.device.click(&Selector::description(texts::OPTIONS), timeout)?;
            bot.idle();
            bot.device.click(&bot.catalog.id(ids::SETTINGS_ROW), timeout)?;
            bot.idle();
            let entry = bot.catalog.id(ids::SETTINGS_TEXT_ROW);
            bot.device.click(&entry.clone().with_text(texts::SECURITY), timeout)?;
            bot.idle();
            bot.device.click(&entry.with_text(texts::LOGIN_ACTIVITY), timeout)?;
            bot.idle();

            let mut logged_out = 0;
            while logged_out < MAX_SESSION_LOGOUTS {
                let Some(menu) = bot.other_session_menu()? else {
                    break;
                };
                bot.device.click_at(menu)?;
                let device_name = bot
                    .device
                    .query(bot.catalog.id(ids::SESSION_DEVICE))
                    .text()
                    .unwrap_or_default();
                let place = bot
                    .device
                    .query(bot.catalog.id(ids::SESSION_TITLE))
                    .text()
                    .unwrap_or_default();
                bot.device.click(&Selector::text(texts::LOG_OUT), timeout)?;
                bot.device.click(&Selector::text(texts::OKAY), timeout)?;
                engine_info!("Logged out '{device_name}, {place}'");
                logged_out += 1;
                bot.idle();
            }
            Ok(logged_out)
        })
    }

    /// Center of the menu icon on the first session that is not this device.
    fn other_session_menu(&self) -> Result<Option<Point>, BotError> {
        let list = Selector::resource_id(ids::SYSTEM_LIST);
        let rows = self
            .device
            .children(&list, &Selector::class_name(classes::LINEAR_LAYOUT))?;
        let Some(row) = rows.get(OTHER_SESSION_ROW) else {
            return Ok(None);
        };
        let icon = self
            .device
            .children(&list, &Selector::class_name(classes::IMAGE_VIEW))?
            .into_iter()
            .filter(|image| row.bounds.contains(&image.bounds))
            .nth(SESSION_MENU_ICON);
        Ok(icon.map(|image| image.bounds.center()))
    }

    /// Kind of the post currently open.
    pub fn current_media_type(&self) -> Result<MediaType, BotError> {
        if self.device.exists(&self.catalog.id(ids::CAROUSEL))? {
            return Ok(MediaType::Carousel);
        }
        let photo = self.device.query(self.catalog.id(ids::FEED_PHOTO)).first()?;
        let is_video = photo
            .description
            .as_deref()
            .is_some_and(|description| description.starts_with(texts::VIDEO_PREFIX));
        Ok(if is_video {
            MediaType::Video
        } else {
            MediaType::Photo
        })
    }
}
