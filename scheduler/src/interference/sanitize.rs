/// Maps a free-form task name onto the file-name form used by measurement files.
///
/// Spaces are dropped, `:`, `(` and `)` become `.`.
pub fn sanitize_task_name(task_name: &str) -> String {
    task_name
        .chars()
        .filter(|c| *c != ' ')
        .map(|c| match c {
            ':' | '(' | ')' => '.',
            other => other,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_pipeline_step_name() {
        assert_eq!(sanitize_task_name("RNA SEQ:align(v2)"), "RNA.SEQ.align.v2.");
        assert_eq!(sanitize_task_name("wf:step (A)"), "wf.step.A.");
    }

    #[test]
    fn test_sanitize_plain_name_unchanged() {
        assert_eq!(sanitize_task_name("simple"), "simple");
        assert_eq!(sanitize_task_name(""), "");
    }

    #[test]
    fn test_sanitize_is_idempotent() {
        for name in [
            "RNA SEQ:align(v2)",
            "  a : b ( c ) ",
            "NFCORE_RNASEQ:RNASEQ:FASTQC (sample_1)",
            "already.clean",
            "::()",
        ] {
            let once = sanitize_task_name(name);
            assert_eq!(sanitize_task_name(&once), once);
        }
    }
}
