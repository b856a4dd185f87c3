//! Builds an [`EncodeSpec`] from planned tasks.

use std::path::Path;

use super::types::{Branch, EncodeSettings, EncodeSpec};
use crate::planner::{PlanningError, TranscodeTask};

/// Builds the one-decode, N-output encode spec for `tasks`, in task order.
///
/// Pure: touches neither the file system nor any process.
///
/// # Errors
///
/// Returns [`PlanningError::EmptyTaskList`] when `tasks` is empty.
pub fn build(
    input: &Path,
    tasks: &[TranscodeTask],
    settings: &EncodeSettings,
) -> Result<EncodeSpec, PlanningError> {
    if tasks.is_empty() {
        return Err(PlanningError::EmptyTaskList);
    }

    let branches = tasks
        .iter()
        .map(|task| Branch {
            label: task.label.clone(),
            width: task.width,
            height: task.height,
            output_dir: task.output_dir.clone(),
            manifest_path: task.manifest_path.clone(),
            segment_pattern: task.segment_pattern.clone(),
        })
        .collect();

    Ok(EncodeSpec::new(
        input.to_path_buf(),
        branches,
        settings.clone(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::job::JobId;
    use crate::ladder::{resolve, Ladder, SourceResolution};
    use crate::planner::{JobPlanner, LayoutConfig};

    fn tasks_for(width: u32, height: u32) -> Vec<TranscodeTask> {
        let plan = resolve(&Ladder::standard(), SourceResolution::new(width, height)).unwrap();
        let job_id: JobId = "00000000-0000-4000-8000-000000000001".parse().unwrap();
        JobPlanner::new(LayoutConfig::new("/out"))
            .layout(&job_id, &plan)
            .tasks
    }

    fn args_as_strings(spec: &EncodeSpec) -> Vec<String> {
        spec.to_args()
            .iter()
            .map(|a| a.to_string_lossy().to_string())
            .collect()
    }

    #[test]
    fn test_build_rejects_empty_task_list() {
        let err = build(Path::new("/in.mp4"), &[], &EncodeSettings::default()).unwrap_err();
        assert!(matches!(err, PlanningError::EmptyTaskList));
    }

    #[test]
    fn test_two_task_stages_agree_positionally() {
        let tasks = tasks_for(854, 480);
        let spec = build(Path::new("/in.mp4"), &tasks, &EncodeSettings::default()).unwrap();

        let split = spec.split_stage();
        let scales = spec.scale_stages();
        let maps = spec.output_maps();

        assert_eq!(split.input, "0:v");
        assert_eq!(split.outputs, vec!["320p", "480p"]);
        assert_eq!(scales.len(), 2);
        assert_eq!(maps.len(), 2);

        for ((split_out, scale), map) in split.outputs.iter().zip(&scales).zip(&maps) {
            assert_eq!(&scale.input, split_out);
            assert_eq!(scale.output, map.stream);
        }

        assert_eq!((scales[0].width, scales[0].height), (512, 320));
        assert_eq!((scales[1].width, scales[1].height), (854, 480));
        assert!(maps[1].manifest_path.ends_with("480p/480p.m3u8"));
    }

    #[test]
    fn test_branch_count_matches_tasks_for_every_plan_size() {
        for (w, h, expected) in [(512, 320, 1), (854, 480, 2), (1280, 720, 3), (1920, 1080, 4)] {
            let tasks = tasks_for(w, h);
            let spec = build(Path::new("/in.mp4"), &tasks, &EncodeSettings::default()).unwrap();
            assert_eq!(spec.split_stage().outputs.len(), expected);
            assert_eq!(spec.scale_stages().len(), expected);
            assert_eq!(spec.output_maps().len(), expected);
            assert_eq!(spec.labels(), tasks.iter().map(|t| t.label.as_str()).collect::<Vec<_>>());
        }
    }

    #[test]
    fn test_filter_graph() {
        let spec = build(
            Path::new("/in.mp4"),
            &tasks_for(1280, 720),
            &EncodeSettings::default(),
        )
        .unwrap();

        assert_eq!(
            spec.filter_graph(),
            "[0:v]split=3[320p][480p][720p];\
             [320p]scale=512:320[v320p];\
             [480p]scale=854:480[v480p];\
             [720p]scale=1280:720[v720p]"
        );
    }

    #[test]
    fn test_args_describe_segmented_outputs() {
        let spec = build(
            Path::new("/uploads/file-abc.mp4"),
            &tasks_for(854, 480),
            &EncodeSettings::default(),
        )
        .unwrap();
        let args = args_as_strings(&spec);

        assert!(args.windows(2).any(|w| w[0] == "-i" && w[1] == "/uploads/file-abc.mp4"));
        assert_eq!(args.iter().filter(|a| *a == "-filter_complex").count(), 1);
        assert_eq!(args.iter().filter(|a| *a == "-hls_time").count(), 2);
        assert!(args.windows(2).any(|w| w[0] == "-map" && w[1] == "[v320p]"));
        assert!(args.windows(2).any(|w| w[0] == "-map" && w[1] == "[v480p]"));
        assert!(args.windows(2).all(|w| w[0] != "-hls_time" || w[1] == "10"));
        assert!(args.windows(2).any(|w| w[0] == "-c:v" && w[1] == "libx264"));
        assert!(args.windows(2).any(|w| w[0] == "-c:a" && w[1] == "aac"));
        assert!(args
            .windows(2)
            .any(|w| w[0] == "-hls_segment_filename" && w[1].ends_with("320p/segment%03d.ts")));
        assert!(args.windows(2).all(|w| w[0] != "-start_number" || w[1] == "0"));
        assert!(args.last().unwrap().ends_with("480p/480p.m3u8"));
    }

    #[test]
    fn test_args_use_configured_settings() {
        let settings = EncodeSettings {
            video_codec: "libx265".to_string(),
            audio_codec: "libopus".to_string(),
            segment_duration_secs: 4,
            playlist_type: "event".to_string(),
            log_level: "warning".to_string(),
            extra_args: vec!["-threads".to_string(), "2".to_string()],
        };
        let spec = build(Path::new("/in.mp4"), &tasks_for(512, 320), &settings).unwrap();
        let args = args_as_strings(&spec);

        assert!(args.windows(2).any(|w| w[0] == "-c:v" && w[1] == "libx265"));
        assert!(args.windows(2).any(|w| w[0] == "-c:a" && w[1] == "libopus"));
        assert!(args.windows(2).any(|w| w[0] == "-hls_time" && w[1] == "4"));
        assert!(args.windows(2).any(|w| w[0] == "-hls_playlist_type" && w[1] == "event"));
        assert!(args.windows(2).any(|w| w[0] == "-loglevel" && w[1] == "warning"));

        // Extra args come before the input
        let threads = args.iter().position(|a| a == "-threads").unwrap();
        let input = args.iter().position(|a| a == "-i").unwrap();
        assert!(threads < input);
    }

    #[test]
    fn test_build_is_deterministic() {
        let tasks = tasks_for(1920, 1080);
        let settings = EncodeSettings::default();
        let a = build(Path::new("/in.mp4"), &tasks, &settings).unwrap();
        let b = build(Path::new("/in.mp4"), &tasks, &settings).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.to_args(), b.to_args());
    }
}
