use log::info;
use std::path::Path;
use std::process::Command;

/// Command opening `path` with the platform's default application
pub fn viewer_command(path: &Path) -> Command {
    #[cfg(target_os = "windows")]
    {
        let mut command = Command::new("cmd");
        command.args(["/C", "start", ""]).arg(path);
        command
    }

    #[cfg(target_os = "macos")]
    {
        let mut command = Command::new("open");
        command.arg(path);
        command
    }

    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        let mut command = Command::new("xdg-open");
        command.arg(path);
        command
    }
}

/// Opens a saved picture (a reaction diagram) without waiting for the viewer
pub fn open_with_default_viewer(path: &Path) -> Result<(), std::io::Error> {
    if !path.is_file() {
        return Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("Image '{}' not found", path.display()),
        ));
    }
    viewer_command(path).spawn()?;
    info!("opened {} in the default viewer", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_viewer_command_targets_the_file() {
        let command = viewer_command(Path::new("reaction_1.svg"));
        let args: Vec<_> = command.get_args().collect();
        assert_eq!(args.last().unwrap().to_str().unwrap(), "reaction_1.svg");
        #[cfg(target_os = "linux")]
        assert_eq!(command.get_program(), "xdg-open");
    }

    #[test]
    fn test_missing_file() {
        let err = open_with_default_viewer(Path::new("/no/such/reaction.svg")).unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::NotFound);
    }
}
