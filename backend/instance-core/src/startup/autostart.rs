//! Per-OS boot registration.
//!
//! | OS | registration |
//! |---|---|
//! | Linux and other Unix | `~/.config/autostart/<identifier>.desktop` |
//! | macOS | `~/Library/LaunchAgents/com.<identifier>.plist` |
//! | Windows | `HKCU\Software\Microsoft\Windows\CurrentVersion\Run\<AppName>` |

use crate::error::StartupError;
use crate::startup::{STARTUP_FLAG, STARTUP_FLAG_VALUE, StartOnBoot};

use common::{APP_DESCRIPTION, APP_IDENTIFIER, APP_NAME, COM_APP_IDENTIFIER, ErrorLocation};

use std::env::current_exe;
use std::panic::Location;
use std::path::{Path, PathBuf};

#[cfg(not(windows))]
use std::fs::{create_dir_all, remove_file, write};
#[cfg(not(windows))]
use std::io::ErrorKind;

#[cfg(not(windows))]
use log::{debug, info};

/// Boot registration for one executable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AutostartEntry {
    executable: PathBuf,
    directory: Option<PathBuf>,
}

impl AutostartEntry {
    pub fn new(executable: impl Into<PathBuf>) -> Self {
        Self {
            executable: executable.into(),
            directory: None,
        }
    }

    /// Registration for the running executable.
    #[track_caller]
    pub fn for_current_exe() -> Result<Self, StartupError> {
        let executable = current_exe().map_err(|e| StartupError::PathUnavailable {
            message: format!("Could not get the path to the application: {e}"),
            location: ErrorLocation::from(Location::caller()),
        })?;
        Ok(Self::new(executable))
    }

    /// Writes file based registrations into `directory` instead of the platform default.
    pub fn with_directory(mut self, directory: impl Into<PathBuf>) -> Self {
        self.directory = Some(directory.into());
        self
    }

    pub fn executable(&self) -> &Path {
        &self.executable
    }

    /// Command line the registration launches, quoted for paths with spaces.
    pub fn launch_command(&self) -> String {
        format!(
            "\"{}\" --{STARTUP_FLAG} {STARTUP_FLAG_VALUE}",
            self.executable.display()
        )
    }

    /// freedesktop.org autostart entry.
    pub fn desktop_entry(&self) -> String {
        format!(
            "[Desktop Entry]\n\
             Version=1.0\n\
             Name={APP_NAME}\n\
             Comment={APP_DESCRIPTION}\n\
             Exec={}\n\
             Terminal=false\n\
             Type=Application\n\
             Categories=Utility;Application;\n",
            self.launch_command()
        )
    }

    /// macOS launch agent property list.
    pub fn launch_agent(&self) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE plist PUBLIC "-//Apple//DTD PLIST 1.0//EN" "http://www.apple.com/DTDs/PropertyList-1.0.dtd">
<plist version="1.0">
    <dict>
        <key>Label</key>
        <string>{COM_APP_IDENTIFIER}</string>
        <key>ProgramArguments</key>
        <array>
            <string>{}</string>
            <string>--{STARTUP_FLAG}</string>
            <string>{STARTUP_FLAG_VALUE}</string>
        </array>
        <key>RunAtLoad</key>
        <true/>
    </dict>
</plist>
"#,
            xml_escape(&self.executable.display().to_string())
        )
    }

    /// Location of the file based registration.
    #[cfg(not(windows))]
    #[track_caller]
    pub fn entry_path(&self) -> Result<PathBuf, StartupError> {
        let directory = match &self.directory {
            Some(directory) => directory.clone(),
            None => default_directory().ok_or_else(|| StartupError::PathUnavailable {
                message: "Could not resolve the autostart directory".to_string(),
                location: ErrorLocation::from(Location::caller()),
            })?,
        };
        Ok(directory.join(entry_file_name()))
    }

    #[cfg(not(windows))]
    fn entry_contents(&self) -> String {
        if cfg!(target_os = "macos") {
            self.launch_agent()
        } else {
            self.desktop_entry()
        }
    }
}

#[cfg(target_os = "macos")]
fn default_directory() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join("Library").join("LaunchAgents"))
}

#[cfg(all(not(windows), not(target_os = "macos")))]
fn default_directory() -> Option<PathBuf> {
    dirs::config_dir().map(|config| config.join("autostart"))
}

#[cfg(not(windows))]
fn entry_file_name() -> String {
    if cfg!(target_os = "macos") {
        format!("{COM_APP_IDENTIFIER}.plist")
    } else {
        format!("{APP_IDENTIFIER}.desktop")
    }
}

fn xml_escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(not(windows))]
impl StartOnBoot for AutostartEntry {
    fn set_start_on_boot(&self, enabled: bool) -> Result<(), StartupError> {
        let path = self.entry_path()?;

        if enabled {
            if let Some(parent) = path.parent() {
                create_dir_all(parent).map_err(|e| StartupError::Io {
                    location: ErrorLocation::from(Location::caller()),
                    path: parent.to_path_buf(),
                    source: e,
                })?;
            }

            write(&path, self.entry_contents()).map_err(|e| StartupError::Io {
                location: ErrorLocation::from(Location::caller()),
                path: path.clone(),
                source: e,
            })?;

            info!("Wrote boot registration {}", path.display());
            return Ok(());
        }

        match remove_file(&path) {
            Ok(()) => {
                info!("Removed boot registration {}", path.display());
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No boot registration at {}", path.display());
                Ok(())
            }
            Err(e) => Err(StartupError::Io {
                location: ErrorLocation::from(Location::caller()),
                path,
                source: e,
            }),
        }
    }

    fn start_on_boot(&self) -> Result<bool, StartupError> {
        Ok(self.entry_path()?.exists())
    }
}

#[cfg(windows)]
impl StartOnBoot for AutostartEntry {
    fn set_start_on_boot(&self, enabled: bool) -> Result<(), StartupError> {
        if enabled {
            registry::set_run_value(APP_NAME, &self.launch_command())
        } else {
            registry::delete_run_value(APP_NAME)
        }
    }

    fn start_on_boot(&self) -> Result<bool, StartupError> {
        registry::has_run_value(APP_NAME)
    }
}

#[cfg(windows)]
mod registry {
    use crate::error::StartupError;

    use common::ErrorLocation;

    use std::panic::Location;

    use log::info;
    use windows::Win32::Foundation::{ERROR_FILE_NOT_FOUND, ERROR_SUCCESS, WIN32_ERROR};
    use windows::Win32::System::Registry::{
        HKEY, HKEY_CURRENT_USER, KEY_QUERY_VALUE, KEY_SET_VALUE, REG_SAM_FLAGS, REG_SZ,
        RegCloseKey, RegDeleteValueW, RegOpenKeyExW, RegQueryValueExW, RegSetValueExW,
    };
    use windows::core::HSTRING;

    const RUN_KEY: &str = r"SOFTWARE\Microsoft\Windows\CurrentVersion\Run";

    /// Closes the key on drop.
    struct RunKey(HKEY);

    impl Drop for RunKey {
        fn drop(&mut self) {
            // SAFETY: the handle came from a successful RegOpenKeyExW and is closed once.
            let _ = unsafe { RegCloseKey(self.0) };
        }
    }

    #[track_caller]
    fn check(status: WIN32_ERROR, action: &str) -> Result<(), StartupError> {
        if status == ERROR_SUCCESS {
            Ok(())
        } else {
            Err(StartupError::Registry {
                message: format!("{action} failed with code {}", status.0),
                location: ErrorLocation::from(Location::caller()),
            })
        }
    }

    fn open_run_key(access: REG_SAM_FLAGS) -> Result<RunKey, StartupError> {
        let mut key = HKEY::default();
        // SAFETY: `key` is a valid out pointer for the duration of the call.
        let status =
            unsafe { RegOpenKeyExW(HKEY_CURRENT_USER, &HSTRING::from(RUN_KEY), 0, access, &mut key) };
        check(status, "Opening the Run key")?;
        Ok(RunKey(key))
    }

    pub(super) fn set_run_value(name: &str, command: &str) -> Result<(), StartupError> {
        let key = open_run_key(KEY_SET_VALUE)?;

        let data = command
            .encode_utf16()
            .chain(Some(0))
            .flat_map(u16::to_le_bytes)
            .collect::<Vec<u8>>();

        // SAFETY: `data` is a NUL terminated UTF-16 string as REG_SZ requires.
        let status = unsafe { RegSetValueExW(key.0, &HSTRING::from(name), 0, REG_SZ, Some(&data)) };
        check(status, "Writing the Run value")?;

        info!("Registered {name} to run at startup");
        Ok(())
    }

    pub(super) fn delete_run_value(name: &str) -> Result<(), StartupError> {
        let key = open_run_key(KEY_SET_VALUE)?;

        // SAFETY: plain call on an open key.
        let status = unsafe { RegDeleteValueW(key.0, &HSTRING::from(name)) };
        if status == ERROR_FILE_NOT_FOUND {
            return Ok(());
        }
        check(status, "Deleting the Run value")?;

        info!("Unregistered {name} from running at startup");
        Ok(())
    }

    pub(super) fn has_run_value(name: &str) -> Result<bool, StartupError> {
        let key = open_run_key(KEY_QUERY_VALUE)?;

        // SAFETY: only asks for existence, no buffers are passed.
        let status =
            unsafe { RegQueryValueExW(key.0, &HSTRING::from(name), None, None, None, None) };
        if status == ERROR_FILE_NOT_FOUND {
            return Ok(false);
        }
        check(status, "Reading the Run value")?;
        Ok(true)
    }
}
