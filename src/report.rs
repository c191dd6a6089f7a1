//! Plain-text frame delay reports.

use std::fmt::Write as _;
use std::ops::Range;

use anim::AnimationDocument;
use anim::split::Motion;

/// The frame label used throughout reports, e.g. `07F` or `123F`.
pub fn frame_label(index: usize) -> String {
    match index {
        0..100 => format!("{index:02}F"),
        100..1000 => format!("{index:03}F"),
        _ => format!("{index:04}F"),
    }
}

/// Every frame's delay, grouped by motion when there are any.
pub fn delay_report(document: &AnimationDocument, motions: &[Motion]) -> String {
    let mut contents = String::with_capacity(16 * document.len());

    if motions.is_empty() {
        _ = writeln!(contents, "--- all frames ---");
        write_delays(&mut contents, document, 0..document.len());
        return contents;
    }

    for motion in motions {
        let range = motion.range();
        _ = writeln!(
            contents,
            "--- {name} ({first} ~ {last}) ---",
            name = motion.name(),
            first = frame_label(range.start),
            last = frame_label(range.end.saturating_sub(1)),
        );
        write_delays(&mut contents, document, range);
        contents.push('\n');
    }

    contents
}

fn write_delays(contents: &mut String, document: &AnimationDocument, frames: Range<usize>) {
    for frame in frames.filter_map(|i| document.frame(i)) {
        _ = writeln!(
            contents,
            "{} : {}ms",
            frame_label(frame.index()),
            frame.delay_ms()
        );
    }
}

/// A one-line-per-frame overview of the document's structure.
pub fn summary(document: &AnimationDocument) -> String {
    let mut contents = String::new();

    _ = writeln!(
        contents,
        "{width}x{height}, {count} frames, {duration}ms, loop: {looping}",
        width = document.width(),
        height = document.height(),
        count = document.len(),
        duration = document.duration_ms(),
        looping = match document.loop_count() {
            Some(0) => "forever".to_owned(),
            Some(count) => count.to_string(),
            None => "none".to_owned(),
        },
    );

    for frame in document.frames() {
        let palette = match (frame.local_palette(), document.global_palette()) {
            (Some(local), _) => format!("local {}", local.len()),
            (None, Some(global)) => format!("global {}", global.len()),
            (None, None) => "none".to_owned(),
        };
        let transparency = frame
            .transparent_index()
            .map_or_else(|| "-".to_owned(), |index| index.to_string());

        _ = writeln!(
            contents,
            "{label} {width}x{height}+{left}+{top} delay={delay}ms disposal={disposal} \
            palette={palette} transparent={transparency}",
            label = frame_label(frame.index()),
            width = frame.width(),
            height = frame.height(),
            left = frame.left(),
            top = frame.top(),
            delay = frame.delay_ms(),
            disposal = frame.disposal(),
        );
    }

    contents
}
