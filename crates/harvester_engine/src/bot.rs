use engine_logging::{engine_debug, engine_error, engine_info, engine_warn};
use rand::rngs::StdRng;
use rand::SeedableRng;
use url::Url;

use crate::catalog::{ids, texts, Catalog};
use crate::device::Device;
use crate::diagnostics;
use crate::error::{BotError, SessionWarning};
use crate::pacer::{Pacer, ThreadPacer};
use crate::settings::BotSettings;

/// A session against one device with the target app in the foreground.
///
/// Operations are strictly sequential: every device call finishes before the
/// next one starts. Fatal errors leave a diagnostics capture behind when
/// [`BotSettings::diagnostics_dir`] is set.
pub struct Bot<D, P = ThreadPacer> {
    pub(crate) device: D,
    pub(crate) settings: BotSettings,
    pub(crate) catalog: Catalog,
    pub(crate) pacer: P,
    pub(crate) rng: StdRng,
    warnings: Vec<SessionWarning>,
}

impl<D: Device> Bot<D, ThreadPacer> {
    /// Starts a session with real pauses and an entropy-seeded rng.
    pub fn connect(device: D, settings: BotSettings) -> Result<Self, BotError> {
        Self::connect_with(device, settings, ThreadPacer, StdRng::from_entropy())
    }
}

impl<D: Device, P: Pacer> Bot<D, P> {
    pub fn connect_with(
        device: D,
        settings: BotSettings,
        pacer: P,
        rng: StdRng,
    ) -> Result<Self, BotError> {
        let mut bot = Self {
            catalog: Catalog::new(&settings.app_id),
            device,
            settings,
            pacer,
            rng,
            warnings: Vec::new(),
        };
        bot.guard(Self::bootstrap)?;
        Ok(bot)
    }

    pub fn device(&self) -> &D {
        &self.device
    }

    pub fn settings(&self) -> &BotSettings {
        &self.settings
    }

    pub fn warnings(&self) -> &[SessionWarning] {
        &self.warnings
    }

    fn bootstrap(&mut self) -> Result<(), BotError> {
        let app_id = self.settings.app_id.clone();
        if !self.device.is_installed(&app_id)? {
            return Err(BotError::TargetNotInstalled { app_id });
        }

        self.device.stop_all()?;
        self.device.launch(&app_id)?;

        let found = self.device.app_info(&app_id)?.version_name;
        if found != self.settings.expected_version {
            engine_warn!(
                "running against {app_id} {found}, expected {}; selectors may not match",
                self.settings.expected_version
            );
            self.warnings.push(SessionWarning::VersionMismatch {
                expected: self.settings.expected_version.clone(),
                found,
            });
        }

        if self.logged_out()? {
            self.device.clear_data(&app_id)?;
            return Err(BotError::SessionLoggedOut);
        }
        engine_info!("session ready on {app_id}");
        Ok(())
    }

    fn logged_out(&self) -> Result<bool, BotError> {
        let dialog = self
            .device
            .query(self.catalog.id(ids::DIALOG_TITLE))
            .texts()?;
        if dialog.iter().any(|title| title == texts::LOGGED_OUT) {
            return Ok(true);
        }
        Ok(self.device.exists(&self.catalog.id(ids::LOGIN_USERNAME))?)
    }

    /// Runs `op`, capturing diagnostics when it fails fatally.
    pub(crate) fn guard<T>(
        &mut self,
        op: impl FnOnce(&mut Self) -> Result<T, BotError>,
    ) -> Result<T, BotError> {
        let result = op(self);
        if let Err(err) = &result {
            if err.is_fatal() {
                engine_error!("{err}");
                self.capture_diagnostics(err);
            }
        }
        result
    }

    /// Like [`Bot::guard`] for yes/no operations: a driver miss reads as `false`.
    pub(crate) fn attempt(
        &mut self,
        what: &str,
        op: impl FnOnce(&mut Self) -> Result<bool, BotError>,
    ) -> Result<bool, BotError> {
        match self.guard(op) {
            Err(BotError::Driver(err)) if err.is_transient() => {
                engine_warn!("{what} failed: {err}");
                Ok(false)
            }
            other => other,
        }
    }

    fn capture_diagnostics(&self, err: &BotError) {
        let Some(dir) = &self.settings.diagnostics_dir else {
            return;
        };
        if let Err(persist) = diagnostics::capture(&self.device, dir, err) {
            engine_warn!("diagnostics capture failed: {persist}");
        }
    }

    /// Random pause in the idle range between navigation steps.
    pub(crate) fn idle(&mut self) {
        let pause = self.settings.idle_pause.sample(&mut self.rng);
        self.pacer.pause(pause);
    }

    /// Kills every app and brings the target back up on its start screen.
    pub fn reset_app(&mut self) -> Result<(), BotError> {
        engine_debug!("restarting {}", self.settings.app_id);
        self.device.stop_all()?;
        self.idle();
        self.device.launch(&self.settings.app_id)?;
        self.idle();
        Ok(())
    }

    pub(crate) fn open_link(&mut self, url: &Url) -> Result<(), BotError> {
        engine_info!("Opening {url}");
        self.device
            .shell(&format!(
                "am start -a android.intent.action.VIEW -d {}",
                shell_quote(url.as_str())
            ))?;
        Ok(())
    }

    /// Taps the profile tab twice, which lands on the own profile from anywhere.
    pub(crate) fn open_own_profile(&mut self) -> Result<(), BotError> {
        let tab = self.catalog.id(ids::PROFILE_TAB);
        self.device.click(&tab, self.settings.element_timeout())?;
        self.device.click(&tab, self.settings.element_timeout())?;
        Ok(())
    }
}

/// Single-quotes `arg` for the device shell; embedded quotes become `'\''`.
fn shell_quote(arg: &str) -> String {
    format!("'{}'", arg.replace('\'', "'\\''"))
}

#[cfg(test)]
mod tests {
    use super::shell_quote;

    #[test]
    fn shell_arguments_are_single_quoted() {
        assert_eq!(shell_quote("a;b"), "'a;b'");
        assert_eq!(shell_quote("it's"), "'it'\\''s'");
    }
}
