//! Command-line arguments.

use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(author, version, about = "Terminal playlist player", long_about = None)]
pub struct Args {
    /// Directory to scan for audio files (defaults to the current directory)
    pub dir: Option<PathBuf>,

    /// Config file to use instead of the default location
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Print the playlist and exit
    #[arg(long)]
    pub list: bool,

    /// Start playing the first track right away
    #[arg(short, long)]
    pub autoplay: bool,
}

impl Args {
    /// Library root: the given directory, else the working directory.
    pub fn library_dir(&self) -> PathBuf {
        self.dir
            .clone()
            .or_else(|| std::env::current_dir().ok())
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_all_flags() {
        let args = Args::parse_from(["segue", "/music", "--config", "/tmp/c.toml", "--list", "-a"]);
        assert_eq!(args.dir, Some(PathBuf::from("/music")));
        assert_eq!(args.config, Some(PathBuf::from("/tmp/c.toml")));
        assert!(args.list);
        assert!(args.autoplay);
        assert_eq!(args.library_dir(), PathBuf::from("/music"));
    }

    #[test]
    fn directory_is_optional() {
        let args = Args::parse_from(["segue"]);
        assert!(args.dir.is_none());
        assert!(!args.list);
        assert!(!args.autoplay);
    }
}
