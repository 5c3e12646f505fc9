use crate::startup::AutostartEntry;

#[cfg(not(windows))]
use crate::startup::StartOnBoot;

#[cfg(not(windows))]
use tempfile::TempDir;

/// **VALUE**: Verifies the registered command relaunches with the boot marker.
///
/// **WHY THIS MATTERS**: The marker is how a boot launch is told apart from a manual one.
///
/// **BUG THIS CATCHES**: Would catch an unquoted path breaking on spaces, or a marker
/// without a value that the argument parser would drop.
#[test]
fn given_executable_with_spaces_when_command_built_then_quoted_with_marker() {
    let entry = AutostartEntry::new("/opt/Play Random/playrandom");

    assert_eq!(
        entry.launch_command(),
        "\"/opt/Play Random/playrandom\" --startup true"
    );
}

/// **VALUE**: Verifies the desktop entry carries the application name and command.
#[test]
fn given_entry_when_desktop_file_rendered_then_exec_line_present() {
    let entry = AutostartEntry::new("/usr/bin/playrandom");

    let contents = entry.desktop_entry();

    assert!(contents.starts_with("[Desktop Entry]\n"));
    assert!(contents.contains("Name=PlayRandom\n"));
    assert!(contents.contains("Exec=\"/usr/bin/playrandom\" --startup true\n"));
    assert!(contents.contains("Type=Application\n"));
}

/// **VALUE**: Verifies launch agent paths are XML escaped.
///
/// **BUG THIS CATCHES**: Would catch an `&` in the path producing an invalid plist.
#[test]
fn given_path_with_markup_when_launch_agent_rendered_then_escaped() {
    let entry = AutostartEntry::new("/Applications/Tom & Jerry/playrandom");

    let contents = entry.launch_agent();

    assert!(contents.contains("<string>/Applications/Tom &amp; Jerry/playrandom</string>"));
    assert!(contents.contains("<string>--startup</string>"));
    assert!(contents.contains("<key>RunAtLoad</key>"));
}

/// **VALUE**: Verifies enabling, querying and disabling a file based registration.
///
/// **WHY THIS MATTERS**: `--set-startup false` must fully undo `--set-startup true`.
///
/// **BUG THIS CATCHES**: Would catch a registration written somewhere `start_on_boot`
/// does not look, or disabling failing when nothing is registered.
#[cfg(not(windows))]
#[test]
fn given_custom_directory_when_toggled_then_file_written_and_removed() {
    // GIVEN
    let dir = TempDir::new().expect("create temp dir");
    let entry = AutostartEntry::new("/usr/bin/playrandom").with_directory(dir.path().join("autostart"));

    // WHEN / THEN
    assert!(!entry.start_on_boot().expect("query"));

    entry.set_start_on_boot(true).expect("enable");
    let path = entry.entry_path().expect("entry path");
    assert!(path.starts_with(dir.path()));
    assert!(path.exists());
    assert!(entry.start_on_boot().expect("query"));

    entry.set_start_on_boot(false).expect("disable");
    assert!(!path.exists());
    assert!(!entry.start_on_boot().expect("query"));

    entry.set_start_on_boot(false).expect("disable twice");
}
