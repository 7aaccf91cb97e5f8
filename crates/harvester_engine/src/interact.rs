//! Runner for the bounded interaction loop. The decisions live in
//! [`harvester_core::update`]; this module only performs the effects.
use std::collections::VecDeque;
use std::time::Duration;

use engine_logging::{engine_debug, engine_error, engine_info};
use harvester_core::{
    classify, update, Effect, LoopState, LoopView, Msg, Pacing, RecoveryVerdict, ScreenProbe,
    RATE_LIMIT_DIALOG_TITLE,
};
use rand::RngCore;

use crate::catalog::{ids, texts, Catalog};
use crate::device::Device;
use crate::error::BotError;
use crate::pacer::Pacer;
use crate::types::{DriverError, Selector, SwipeDirection};

/// One kind of repeated action on a scrolling screen.
pub trait Interaction {
    fn rate_limited(&mut self) -> Result<bool, DriverError>;

    /// Whether an actionable target is visible right now.
    fn has_targets(&mut self) -> Result<bool, DriverError>;

    /// Acts on one target. Returns the units to add to the counter, which
    /// may be zero or negative.
    fn enact_one(&mut self) -> Result<i32, DriverError>;

    fn scroll(&mut self) -> Result<(), DriverError>;

    /// Reads the markers the recovery classifier looks at.
    fn probe(&mut self) -> Result<ScreenProbe, DriverError>;

    fn navigate_back(&mut self) -> Result<(), DriverError>;
}

/// Acts until `target` units are counted or the rate limiter shows up.
///
/// Misses are classified and retried without limit. A rate-limit sighting
/// ends the run with [`BotError::RateLimited`] and no further action.
pub fn run_bounded(
    target: u32,
    interaction: &mut dyn Interaction,
    pacing: Pacing,
    pacer: &mut dyn Pacer,
    rng: &mut dyn RngCore,
) -> Result<LoopView, BotError> {
    let mut state = LoopState::new(target);
    let mut inbox = VecDeque::from([Msg::Started]);

    while let Some(msg) = inbox.pop_front() {
        let (next, effects) = update(state, msg);
        state = next;
        if state.consume_dirty() {
            engine_debug!("Liking: {}", state.view());
        }

        for effect in effects {
            match effect {
                Effect::Scan => inbox.push_back(scan(interaction)?),
                Effect::EnactOne => {
                    let outcome = interaction.enact_one().map(|units| Msg::Enacted { units });
                    inbox.push_back(absorb_miss(outcome)?);
                }
                Effect::Scroll => {
                    let outcome = interaction.scroll().map(|()| Msg::Scrolled);
                    inbox.push_back(absorb_miss(outcome)?);
                }
                Effect::Backoff => pacer.pause(pacing.sample(rng)),
                Effect::ClassifyFailure => {
                    let verdict = match interaction.probe() {
                        Ok(probe) => classify(&probe),
                        Err(err) if err.is_transient() => RecoveryVerdict::Ignore,
                        Err(err) => return Err(err.into()),
                    };
                    engine_debug!("element missing, verdict {verdict:?}");
                    inbox.push_back(Msg::Classified(verdict));
                }
                Effect::NavigateBack => match interaction.navigate_back() {
                    Err(err) if !err.is_transient() => return Err(err.into()),
                    _ => {}
                },
                Effect::Abort => {
                    engine_error!("rate limited after {}", state.view());
                    return Err(BotError::RateLimited);
                }
                Effect::Finish => {}
            }
        }
    }

    let view = state.view();
    engine_info!("Liked: {view}");
    Ok(view)
}

fn scan(interaction: &mut dyn Interaction) -> Result<Msg, BotError> {
    let outcome = interaction.rate_limited().and_then(|limited| {
        if limited {
            Ok(Msg::RateLimitDetected)
        } else {
            interaction
                .has_targets()
                .map(|actionable| Msg::Scanned { actionable })
        }
    });
    absorb_miss(outcome)
}

fn absorb_miss(outcome: Result<Msg, DriverError>) -> Result<Msg, BotError> {
    match outcome {
        Ok(msg) => Ok(msg),
        Err(err) if err.is_transient() => Ok(Msg::ElementMissing),
        Err(err) => Err(err.into()),
    }
}

/// Likes posts on whatever feed is open.
pub struct FeedLikes<'d, D: ?Sized> {
    device: &'d D,
    like_button: Selector,
    secondary_label: Selector,
    feed: Selector,
    dialog_title: Selector,
    profile_header: Selector,
    camera_controls: Selector,
    top_bar: Selector,
    timeout: Duration,
    sponsored_on_screen: bool,
}

impl<'d, D: Device + ?Sized> FeedLikes<'d, D> {
    pub fn new(device: &'d D, catalog: &Catalog, timeout: Duration) -> Self {
        Self {
            device,
            like_button: catalog
                .id(ids::FEED_LIKE_BUTTON)
                .with_description(texts::LIKE),
            secondary_label: catalog.id(ids::FEED_SECONDARY_LABEL),
            feed: catalog.id(ids::FEED_CONTAINER),
            dialog_title: catalog.id(ids::DIALOG_TITLE),
            profile_header: catalog.id(ids::PROFILE_HEADER_STUB),
            camera_controls: catalog.id(ids::CAMERA_TOP_CONTROLS),
            top_bar: catalog.id(ids::ACTION_BAR_NEW_TITLE),
            timeout,
            sponsored_on_screen: false,
        }
    }

    fn dialog_title(&self) -> Result<Option<String>, DriverError> {
        Ok(self
            .device
            .elements(&self.dialog_title)?
            .into_iter()
            .next()
            .and_then(|element| element.text))
    }

    fn sponsored_visible(&self) -> Result<bool, DriverError> {
        Ok(self
            .device
            .elements(&self.secondary_label)?
            .iter()
            .any(|label| label.text_or_empty() == texts::SPONSORED))
    }
}

impl<D: Device + ?Sized> Interaction for FeedLikes<'_, D> {
    fn rate_limited(&mut self) -> Result<bool, DriverError> {
        Ok(self.dialog_title()?.as_deref() == Some(RATE_LIMIT_DIALOG_TITLE))
    }

    fn has_targets(&mut self) -> Result<bool, DriverError> {
        self.device.exists(&self.like_button)
    }

    /// A sponsored post scrolling into view takes one unit back, once per
    /// appearance, so ads do not count toward the target.
    // TODO: confirm with product whether ads should count at all; today the
    // offset applies on the first like after the label shows up.
    fn enact_one(&mut self) -> Result<i32, DriverError> {
        let sponsored = self.sponsored_visible()?;
        self.device.click(&self.like_button, self.timeout)?;
        let offset = if sponsored && !self.sponsored_on_screen { -1 } else { 0 };
        self.sponsored_on_screen = sponsored;
        Ok(1 + offset)
    }

    fn scroll(&mut self) -> Result<(), DriverError> {
        self.device.swipe_within(&self.feed, SwipeDirection::Up)
    }

    fn probe(&mut self) -> Result<ScreenProbe, DriverError> {
        Ok(ScreenProbe {
            dialog_title: self.dialog_title()?,
            profile_header: self.device.exists(&self.profile_header)?,
            camera_controls: self.device.exists(&self.camera_controls)?,
            top_bar: self.device.exists(&self.top_bar)?,
            feed_container: self.device.exists(&self.feed)?,
        })
    }

    fn navigate_back(&mut self) -> Result<(), DriverError> {
        engine_debug!("off the feed, going back");
        self.device.press_back()
    }
}
