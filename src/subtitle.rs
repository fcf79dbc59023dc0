use crate::error::{ClipSrtError, Result};
use crate::timeline::Cue;

/// Render cues as SRT text. Every cue, including the last, is followed by a
/// blank line.
pub fn render_srt(cues: &[Cue]) -> String {
    let mut srt_content = String::new();

    for cue in cues {
        srt_content.push_str(&format!(
            "{}\n{} --> {}\n{}\n\n",
            cue.index,
            format_srt_time(cue.start),
            format_srt_time(cue.end),
            cue.dialogue
        ));
    }

    srt_content
}

/// Format time in seconds to SRT time format (HH:MM:SS,mmm)
///
/// The total is rounded to the nearest millisecond before it is split into
/// fields, so no field can overflow its range.
pub fn format_srt_time(seconds: f64) -> String {
    let total_milliseconds = (seconds.max(0.0) * 1000.0).round() as u64;
    let hours = total_milliseconds / 3_600_000;
    let minutes = (total_milliseconds % 3_600_000) / 60_000;
    let secs = (total_milliseconds % 60_000) / 1_000;
    let millis = total_milliseconds % 1_000;

    format!("{:02}:{:02}:{:02},{:03}", hours, minutes, secs, millis)
}

/// Parse an SRT timestamp (HH:MM:SS,mmm) back into seconds
pub fn parse_srt_time(timestamp: &str) -> Result<f64> {
    let invalid = || ClipSrtError::UnsupportedFormat(format!("Invalid SRT timestamp: '{}'", timestamp));

    let (clock, millis) = timestamp.trim().split_once(',').ok_or_else(invalid)?;
    let fields: Vec<&str> = clock.split(':').collect();
    if fields.len() != 3 || millis.len() != 3 {
        return Err(invalid());
    }

    let parse = |field: &str| field.parse::<u64>().map_err(|_| invalid());
    let hours = parse(fields[0])?;
    let minutes = parse(fields[1])?;
    let secs = parse(fields[2])?;
    let millis = parse(millis)?;
    if minutes >= 60 || secs >= 60 {
        return Err(invalid());
    }

    let total_milliseconds = hours * 3_600_000 + minutes * 60_000 + secs * 1_000 + millis;
    Ok(total_milliseconds as f64 / 1000.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cue(index: usize, start: f64, end: f64, dialogue: &str) -> Cue {
        Cue {
            index,
            start,
            end,
            dialogue: dialogue.to_string(),
            base_name: format!("clip{}", index),
            source_duration: end - start,
            adjusted_duration: end - start,
            frames: None,
            drift: 0.0,
        }
    }

    #[test]
    fn test_format_srt_time() {
        assert_eq!(format_srt_time(0.0), "00:00:00,000");
        assert_eq!(format_srt_time(65.123), "00:01:05,123");
        assert_eq!(format_srt_time(3661.500), "01:01:01,500");
    }

    #[test]
    fn test_format_srt_time_rounds_total_milliseconds() {
        assert_eq!(format_srt_time(3661.4995), "01:01:01,500");
        assert_eq!(format_srt_time(59.9996), "00:01:00,000");
        assert_eq!(format_srt_time(3599.9999), "01:00:00,000");
        assert_eq!(format_srt_time(7.0 / 24.0), "00:00:00,292");
    }

    #[test]
    fn test_format_srt_time_clamps_negative() {
        assert_eq!(format_srt_time(-0.5), "00:00:00,000");
    }

    #[test]
    fn test_parse_srt_time() {
        assert_eq!(parse_srt_time("00:00:00,000").unwrap(), 0.0);
        assert_eq!(parse_srt_time("01:01:01,500").unwrap(), 3661.5);
        assert!(parse_srt_time("01:01:01.500").is_err());
        assert!(parse_srt_time("00:61:00,000").is_err());
        assert!(parse_srt_time("1:2,3").is_err());
    }

    #[test]
    fn test_format_parse_round_trip() {
        let mut t = 0.0;
        while t <= 99_999.0 {
            let formatted = format_srt_time(t);
            let reparsed = parse_srt_time(&formatted).unwrap();
            assert_eq!(format_srt_time(reparsed), formatted);
            t += 7.0013;
        }
        let formatted = format_srt_time(99_999.0);
        assert_eq!(format_srt_time(parse_srt_time(&formatted).unwrap()), formatted);
    }

    #[test]
    fn test_render_srt() {
        let cues = vec![cue(1, 0.0, 2.0, "Hello"), cue(2, 2.0, 5.0, "World")];
        assert_eq!(
            render_srt(&cues),
            "1\n00:00:00,000 --> 00:00:02,000\nHello\n\n2\n00:00:02,000 --> 00:00:05,000\nWorld\n\n"
        );
    }

    #[test]
    fn test_render_srt_keeps_multiline_and_empty_dialogue() {
        let cues = vec![cue(1, 0.0, 1.0, "first line\n  second line"), cue(2, 1.0, 1.0, "")];
        assert_eq!(
            render_srt(&cues),
            "1\n00:00:00,000 --> 00:00:01,000\nfirst line\n  second line\n\n2\n00:00:01,000 --> 00:00:01,000\n\n\n"
        );
    }

    #[test]
    fn test_render_srt_empty() {
        assert_eq!(render_srt(&[]), "");
    }
}
