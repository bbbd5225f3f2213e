use indicatif::{ProgressBar, ProgressStyle};

pub fn create_progress_bar(len: u64, message: String) -> ProgressBar {
    let bar = ProgressBar::new(len);
    bar.set_style(
        ProgressStyle::default_bar()
            .template("{msg} [{bar:30}] {pos}/{len} rows")
            .unwrap()
            .progress_chars("=> "),
    );
    bar.set_message(message);
    bar
}
