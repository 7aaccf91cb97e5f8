//! Identity-list harvests: followers, following, notifications, hashtags
//! and authors of liked posts.
use std::time::Duration;

use engine_logging::{engine_debug, engine_info, engine_warn};
use harvester_core::{parse_count, Harvest, Identity, Row, TerminationSignal};

use crate::bot::Bot;
use crate::catalog::{classes, ids, texts, Catalog};
use crate::device::Device;
use crate::error::BotError;
use crate::harvest::{harvest, scroll_across, Extract, ListSource, ScreenList};
use crate::pacer::Pacer;
use crate::types::{DriverError, Point, ScrollVector, Selector};

/// Sort option picked before harvesting the following list; the third entry
/// keeps the order stable while scrolling.
const FOLLOWING_SORT_OPTION: usize = 2;
const SORT_MENU_ATTEMPTS: usize = 3;
const LOAD_MORE_LIMIT: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProfileCounts {
    pub followers: u64,
    pub following: u64,
}

impl<D: Device, P: Pacer> Bot<D, P> {
    /// Follower and following counts from the own profile header.
    pub fn profile_counts(&mut self) -> Result<ProfileCounts, BotError> {
        self.guard(|bot| {
            bot.open_own_profile()?;
            bot.read_counts()
        })
    }

    fn read_counts(&self) -> Result<ProfileCounts, BotError> {
        let read = |id: &str| -> Result<u64, BotError> {
            let raw = self.device.query(self.catalog.id(id)).text()?;
            Ok(parse_count(&raw)?)
        };
        Ok(ProfileCounts {
            followers: read(ids::FOLLOWERS_COUNT)?,
            following: read(ids::FOLLOWING_COUNT)?,
        })
    }

    fn log_counts(&self) {
        match self.read_counts() {
            Ok(counts) => engine_info!(
                "{} followers, {} following",
                counts.followers,
                counts.following
            ),
            Err(err) => engine_warn!("profile counts unavailable: {err}"),
        }
    }

    /// Everyone following the account, up to the "Suggestions for you" block.
    pub fn list_followers(&mut self) -> Result<Harvest, BotError> {
        self.guard(|bot| {
            bot.reset_app()?;
            bot.open_own_profile()?;
            bot.log_counts();
            bot.device.click(
                &bot.catalog.id(ids::FOLLOWERS_CONTAINER),
                bot.settings.element_timeout(),
            )?;
            bot.idle();

            let limits = bot.settings.harvest_limits(None);
            let mut source = ScreenList::new(&bot.device, bot.catalog.id(ids::FOLLOW_LIST_USERNAME))
                .sentinel(
                    bot.catalog
                        .id(ids::ROW_HEADER)
                        .with_text(texts::SUGGESTIONS_FOR_YOU),
                )
                .scroll_over(bot.catalog.id(ids::FOLLOW_LIST_CONTAINER))
                .min_rows(bot.settings.min_scroll_rows)
                .retry(Selector::description(texts::RETRY), bot.settings.retry_pause());
            Ok(harvest(&mut source, limits, &mut bot.pacer, "Followers")?)
        })
    }

    /// Every account the session follows, in a stable sort order.
    pub fn list_following(&mut self) -> Result<Harvest, BotError> {
        self.guard(|bot| {
            bot.reset_app()?;
            bot.open_own_profile()?;
            bot.log_counts();
            bot.open_following_list()?;
            bot.sort_following()?;
            bot.skip_list_header()?;

            let limits = bot.settings.harvest_limits(None);
            let mut source = ScreenList::new(&bot.device, bot.catalog.id(ids::FOLLOW_LIST_USERNAME))
                .sentinel(Selector::text(texts::SUGGESTIONS_FOR_YOU))
                .scroll_over(bot.catalog.id(ids::FOLLOW_LIST_CONTAINER))
                .min_rows(bot.settings.min_scroll_rows);
            Ok(harvest(&mut source, limits, &mut bot.pacer, "Following")?)
        })
    }

    /// Followed accounts the session interacts with least. This list has no
    /// end marker, so it always ends on a stall.
    pub fn list_least_interacted(&mut self) -> Result<Harvest, BotError> {
        self.guard(|bot| {
            bot.reset_app()?;
            bot.open_own_profile()?;
            bot.open_following_list()?;
            bot.device.click(
                &bot.catalog.id(ids::LIST_TITLE).with_text(texts::LEAST_INTERACTED),
                bot.settings.element_timeout(),
            )?;
            let title = bot
                .catalog
                .id(ids::ACTION_BAR_TITLE)
                .with_text(texts::LEAST_INTERACTED);
            if !bot.device.wait_exists(&title, bot.settings.tab_timeout())? {
                return Err(DriverError::not_found(&title).into());
            }
            bot.idle();

            let limits = bot.settings.harvest_limits(None);
            let mut source = ScreenList::new(&bot.device, bot.catalog.id(ids::FOLLOW_LIST_USERNAME))
                .scroll_over(
                    bot.catalog
                        .id(ids::FOLLOW_LIST_CONTAINER)
                        .with_class(classes::LINEAR_LAYOUT),
                )
                .min_rows(bot.settings.min_scroll_rows);
            Ok(harvest(&mut source, limits, &mut bot.pacer, "Least interacted")?)
        })
    }

    /// Accounts behind the latest activity notifications.
    pub fn list_notification_senders(&mut self) -> Result<Harvest, BotError> {
        self.guard(|bot| {
            let tab = bot.catalog.id(ids::NOTIFICATION_TAB);
            bot.device.click(&tab, bot.settings.element_timeout())?;
            bot.device.click(&tab, bot.settings.element_timeout())?;

            let limits = bot.settings.harvest_limits(None);
            let mut source = ScreenList::new(&bot.device, bot.catalog.id(ids::NOTIFICATION_ROW_TEXT))
                .extract(Extract::FirstWord)
                .sentinel(Selector::text(texts::SUGGESTIONS_FOR_YOU))
                .min_rows(bot.settings.min_scroll_rows);
            Ok(harvest(&mut source, limits, &mut bot.pacer, "Notifications")?)
        })
    }

    /// Hashtags the session follows.
    pub fn list_followed_hashtags(&mut self) -> Result<Harvest, BotError> {
        self.guard(|bot| {
            bot.reset_app()?;
            bot.open_own_profile()?;
            bot.open_following_list()?;
            bot.device.click(
                &bot.catalog.id(ids::HASHTAG_ROW_IMAGE),
                bot.settings.element_timeout(),
            )?;
            bot.idle();

            let limits = bot.settings.harvest_limits(None);
            let rows = bot.catalog.id(ids::FOLLOW_BUTTON).with_text(texts::FOLLOWING);
            let mut source = ScreenList::new(&bot.device, rows)
                .extract(Extract::DescriptionWord(1))
                .sentinel(bot.catalog.id(ids::ROW_HEADER).with_text(texts::SUGGESTIONS))
                .scroll_over(bot.catalog.id(ids::FOLLOW_LIST_AVATAR))
                .min_rows(bot.settings.min_scroll_rows)
                .stay_on(bot.catalog.id(ids::ACTION_BAR_TITLE), texts::HASHTAGS_TITLE);
            Ok(harvest(&mut source, limits, &mut bot.pacer, "Hashtags")?)
        })
    }

    /// Authors of posts the session liked who it does not follow yet.
    pub fn list_liked_by_me(&mut self, amount: usize) -> Result<Harvest, BotError> {
        if amount == 0 {
            return Ok(Harvest {
                items: Vec::new(),
                signal: TerminationSignal::CountThreshold,
            });
        }
        self.guard(|bot| {
            bot.open_own_profile()?;
            let timeout = bot.settings.element_timeout();
            bot.device.click(&Selector::description(texts::OPTIONS), timeout)?;
            bot.device.click(&bot.catalog.id(ids::SETTINGS_ROW), timeout)?;
            let entry = bot.catalog.id(ids::SETTINGS_TEXT_ROW);
            bot.device.click(&entry.clone().with_text(texts::ACCOUNT), timeout)?;
            bot.device.click(&entry.with_text(texts::LIKED_POSTS), timeout)?;

            let limits = bot.settings.harvest_limits(Some(amount));
            let mut source = LikedPostAuthors {
                device: &bot.device,
                catalog: &bot.catalog,
                min_rows: bot.settings.min_scroll_rows,
                settle: bot.settings.poll_interval(),
                budget: amount,
            };
            Ok(harvest(&mut source, limits, &mut bot.pacer, "Liked authors")?)
        })
    }

    fn open_following_list(&mut self) -> Result<(), BotError> {
        self.device.click(
            &self.catalog.id(ids::FOLLOWING_CONTAINER),
            self.settings.element_timeout(),
        )?;
        self.idle();
        Ok(())
    }

    fn sort_following(&mut self) -> Result<(), BotError> {
        let radio = self.catalog.id(ids::SORT_RADIO);
        for _ in 0..SORT_MENU_ATTEMPTS {
            if self.device.exists(&radio)? {
                break;
            }
            self.device.click(
                &self.catalog.id(ids::SORT_ICON),
                self.settings.element_timeout(),
            )?;
            self.idle();
        }
        self.device
            .click(&radio.nth(FOLLOWING_SORT_OPTION), self.settings.element_timeout())?;
        self.idle();
        Ok(())
    }

    /// Drags the sort row up under the search field so the first rows are not
    /// hidden behind the list header.
    fn skip_list_header(&mut self) -> Result<(), BotError> {
        if !self.device.exists(&self.catalog.id(ids::FOLLOW_LIST_USERNAME))? {
            return Ok(());
        }
        let sort = self.device.query(self.catalog.id(ids::SORT_OPTION_ROW)).bounds()?;
        let search = self.device.query(self.catalog.id(ids::SEARCH_FIELD)).bounds()?;
        let x = sort.right / 2;
        let gesture = ScrollVector {
            from: Point { x, y: sort.top },
            to: Point { x, y: search.bottom },
            duration: Duration::ZERO,
        };
        if gesture.from != gesture.to {
            self.device.swipe(&gesture)?;
        }
        Ok(())
    }
}

/// Opens each liked post in the grid, keeps its author when the post still
/// offers a "Follow" button, and goes back.
///
/// A batch stops opening posts once it holds `budget` authors: every earlier
/// author is either in the batch again or already counted.
struct LikedPostAuthors<'d, D> {
    device: &'d D,
    catalog: &'d Catalog,
    min_rows: usize,
    settle: Duration,
    budget: usize,
}

impl<D: Device> LikedPostAuthors<'_, D> {
    /// Author of the open post; `None` when it is already followed or unlabeled.
    fn read_author(&self) -> Result<Option<Identity>, DriverError> {
        let follow = self.catalog.id(ids::BUTTON).with_text(texts::FOLLOW);
        if !self.device.exists(&follow)? {
            return Ok(None);
        }
        let labels = self.device.elements(&self.catalog.id(ids::FEED_AUTHOR))?;
        Ok(labels
            .first()
            .and_then(|label| label.text_or_empty().split_whitespace().next())
            .map(Identity::new))
    }
}

impl<D: Device> ListSource for LikedPostAuthors<'_, D> {
    fn read_batch(&mut self, pacer: &mut dyn Pacer) -> Result<Vec<Row>, DriverError> {
        let grid_row = self.catalog.id(ids::MEDIA_GRID_ROW);
        let thumb = Selector::class_name(classes::IMAGE_VIEW);

        let mut batch = Vec::new();
        let rows = self.device.elements(&grid_row)?.len();
        'grid: for row in 0..rows {
            let thumbs = self.device.children(&grid_row.clone().nth(row), &thumb)?;
            for post in thumbs {
                if batch.len() >= self.budget {
                    break 'grid;
                }
                self.device.click_at(post.bounds.center())?;
                pacer.pause(self.settle);
                let author = self.read_author();
                self.device.press_back()?;
                match author {
                    Ok(Some(name)) => batch.push(Row::Item(name)),
                    Ok(None) => {}
                    Err(err) if err.is_transient() => {
                        engine_debug!("skipping liked post: {err}");
                    }
                    Err(err) => return Err(err),
                }
            }
        }
        Ok(batch)
    }

    fn scroll(&mut self, pacer: &mut dyn Pacer) -> Result<(), DriverError> {
        scroll_across(self.device, &self.catalog.id(ids::MEDIA_GRID_ROW), self.min_rows)?;
        let load_more = self.catalog.id(ids::LOAD_MORE);
        for _ in 0..LOAD_MORE_LIMIT {
            if !self.device.exists(&load_more)? {
                break;
            }
            engine_debug!("loading more liked posts");
            self.device.click(&load_more, Duration::ZERO)?;
            pacer.pause(self.settle);
        }
        Ok(())
    }
}
