use indicatif::{ProgressBar, ProgressStyle};

/// Displays progress over the total number of iterations across all
/// instances. Each runner ticks the bar once per completed iteration.
pub(crate) fn iteration_progress(total_iterations: u64) -> ProgressBar {
    let pb = ProgressBar::new(total_iterations);
    pb.set_style(
        ProgressStyle::with_template(
            "{spinner:.green} [{wide_bar:.cyan/blue}] {pos}/{len} iterations ({elapsed_precise})",
        )
        .expect("Failed to set progress style")
        .progress_chars("#>-"),
    );

    pb
}
