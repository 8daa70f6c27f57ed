//! End-to-end tests for folder tiling

use std::fs;
use std::path::{Path, PathBuf};

use ndarray::{ArrayD, IxDyn};
use tempfile::tempdir;

use patchkit::commands::{build_cli, CommandFactory, PatchkitCommandFactory};
use patchkit::{run_job, MrcReader, MrcWriter, PatchError, PatchKit, TileParams, TilingJob};

/// Write an `height` x `width` ramp image where sample (r, c) is `r * 1000 + c`
fn write_micrograph(dir: &Path, name: &str, height: usize, width: usize) -> PathBuf {
    let values = (0..height)
        .flat_map(|r| (0..width).map(move |c| (r * 1000 + c) as f32))
        .collect();
    let data = ArrayD::from_shape_vec(IxDyn(&[height, width]), values).unwrap();
    let path = dir.join(name);
    MrcWriter::new(3).write(&data.view(), [1.5, 1.5, 1.5], &path).unwrap();
    path
}

fn job(input: &Path, output: &Path, tile_size: usize, stride: usize) -> TilingJob {
    TilingJob::builder(input, output)
        .with_tile_size(tile_size)
        .with_stride(stride)
        .with_concurrency(2)
        .with_progress(false)
        .build()
        .unwrap()
}

fn sorted_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[test]
fn test_patches_are_numbered_row_major() {
    let temp = tempdir().unwrap();
    let input = temp.path().join("in");
    let output = temp.path().join("out");
    fs::create_dir(&input).unwrap();
    // rows [0, 2, 4] x cols [0, 2, 4, 6]
    write_micrograph(&input, "mic001.mrc", 8, 10);

    let summary = run_job(&job(&input, &output, 4, 2)).unwrap();

    assert!(summary.is_success());
    assert_eq!(summary.total, 1);
    assert_eq!(summary.patches_written, 12);
    let expected: Vec<String> = (1..=12).map(|i| format!("mic001_s{:03}.mrc", i)).collect();
    assert_eq!(sorted_names(&output), expected);

    // Patch 6 is the second column of the second row: origin (2, 2)
    let patch = MrcReader::new().load(&output.join("mic001_s006.mrc")).unwrap();
    assert_eq!(patch.shape(), &[4, 4]);
    assert_eq!(patch.view()[[0, 0]], 2002.0);
    assert_eq!(patch.view()[[3, 3]], 5005.0);
    assert_eq!(patch.voxel_size(), [1.5, 1.5, 1.5]);
}

#[test]
fn test_edge_patch_is_aligned_to_boundary() {
    let temp = tempdir().unwrap();
    let input = temp.path().join("in");
    let output = temp.path().join("out");
    fs::create_dir(&input).unwrap();
    write_micrograph(&input, "big.mrc", 500, 500);

    let summary = run_job(&job(&input, &output, 480, 240)).unwrap();

    assert_eq!(summary.patches_written, 4);
    let last = MrcReader::new().load(&output.join("big_s004.mrc")).unwrap();
    assert_eq!(last.shape(), &[480, 480]);
    assert_eq!(last.view()[[0, 0]], 20020.0);
    assert_eq!(last.view()[[479, 479]], 499499.0);
}

#[test]
fn test_exact_size_image_gives_one_patch() {
    let temp = tempdir().unwrap();
    let input = temp.path().join("in");
    let output = temp.path().join("out");
    fs::create_dir(&input).unwrap();
    write_micrograph(&input, "exact.mrc", 6, 6);

    let summary = run_job(&job(&input, &output, 6, 3)).unwrap();

    assert_eq!(summary.patches_written, 1);
    assert_eq!(sorted_names(&output), vec!["exact_s001.mrc"]);
}

#[test]
fn test_existing_save_folder_aborts_without_writing() {
    let temp = tempdir().unwrap();
    let input = temp.path().join("in");
    let output = temp.path().join("out");
    fs::create_dir(&input).unwrap();
    fs::create_dir(&output).unwrap();
    write_micrograph(&input, "mic001.mrc", 8, 8);

    let result = run_job(&job(&input, &output, 4, 4));

    assert!(matches!(result, Err(PatchError::OutputExists(_))));
    assert!(sorted_names(&output).is_empty());
}

#[test]
fn test_missing_input_folder_is_rejected_before_mkdir() {
    let temp = tempdir().unwrap();
    let output = temp.path().join("out");

    let result = run_job(&job(&temp.path().join("missing"), &output, 4, 4));

    assert!(matches!(result, Err(PatchError::Configuration(_))));
    assert!(!output.exists());
}

#[test]
fn test_failing_files_do_not_stop_the_others() {
    let temp = tempdir().unwrap();
    let input = temp.path().join("in");
    let output = temp.path().join("out");
    fs::create_dir(&input).unwrap();
    write_micrograph(&input, "good.mrc", 8, 8);
    write_micrograph(&input, "tiny.mrc", 3, 3);
    fs::write(input.join("broken.mrc"), b"not an mrc file").unwrap();

    let summary = run_job(&job(&input, &output, 4, 4)).unwrap();

    assert_eq!(summary.total, 3);
    assert_eq!(summary.succeeded, 1);
    assert_eq!(summary.patches_written, 4);
    assert_eq!(summary.failures.len(), 2);
    assert!(summary.ensure_success().is_err());

    for (path, error) in &summary.failures {
        match path.file_name().unwrap().to_str().unwrap() {
            "broken.mrc" => assert!(matches!(error, PatchError::Load { .. })),
            "tiny.mrc" => assert!(matches!(error, PatchError::InvalidDimensions { .. })),
            other => panic!("unexpected failure for {}", other),
        }
    }
    assert_eq!(
        sorted_names(&output),
        vec!["good_s001.mrc", "good_s002.mrc", "good_s003.mrc", "good_s004.mrc"]
    );
}

#[test]
fn test_compressed_input_gives_compressed_patches() {
    let temp = tempdir().unwrap();
    let input = temp.path().join("in");
    let output = temp.path().join("out");
    fs::create_dir(&input).unwrap();
    write_micrograph(&input, "mic.mrc.gz", 4, 8);

    let summary = run_job(&job(&input, &output, 4, 4)).unwrap();

    assert_eq!(summary.patches_written, 2);
    let raw = fs::read(output.join("mic.mrc_s002.gz")).unwrap();
    assert_eq!(&raw[..2], &[0x1f, 0x8b]);
    let patch = MrcReader::new().load(&output.join("mic.mrc_s002.gz")).unwrap();
    assert_eq!(patch.view()[[1, 0]], 1004.0);
}

#[test]
fn test_rerun_produces_identical_files() {
    let temp = tempdir().unwrap();
    let input = temp.path().join("in");
    fs::create_dir(&input).unwrap();
    write_micrograph(&input, "mic.mrc", 9, 9);

    let first = temp.path().join("first");
    let second = temp.path().join("second");
    run_job(&job(&input, &first, 5, 2)).unwrap();
    run_job(&job(&input, &second, 5, 2)).unwrap();

    let names = sorted_names(&first);
    assert_eq!(names, sorted_names(&second));
    for name in names {
        assert_eq!(fs::read(first.join(&name)).unwrap(), fs::read(second.join(&name)).unwrap());
    }
}

#[test]
fn test_batch_stops_at_existing_save_folder() {
    let temp = tempdir().unwrap();
    let root = temp.path();
    fs::create_dir(root.join("hr")).unwrap();
    fs::create_dir(root.join("lr")).unwrap();
    fs::create_dir(root.join("lr_sub")).unwrap();
    write_micrograph(&root.join("hr"), "mic.mrc", 8, 8);
    write_micrograph(&root.join("lr"), "mic.mrc", 4, 4);

    let config = root.join("jobs.toml");
    let as_toml = |p: PathBuf| p.to_string_lossy().replace('\\', "/");
    fs::write(
        &config,
        format!(
            "n_thread = 2\n\n\
             [[job]]\ninput_folder = \"{}\"\nsave_folder = \"{}\"\ncrop_size = 4\nstep = 4\n\n\
             [[job]]\ninput_folder = \"{}\"\nsave_folder = \"{}\"\ncrop_size = 2\nstep = 2\n\n\
             [[job]]\ninput_folder = \"{}\"\nsave_folder = \"{}\"\ncrop_size = 2\nstep = 2\n",
            as_toml(root.join("hr")),
            as_toml(root.join("hr_sub")),
            as_toml(root.join("lr")),
            as_toml(root.join("lr_sub")),
            as_toml(root.join("lr")),
            as_toml(root.join("lr_sub2")),
        ),
    )
    .unwrap();

    let matches = build_cli()
        .try_get_matches_from(["patchkit", "batch", config.to_str().unwrap(), "--no-progress"])
        .unwrap();
    let command = PatchkitCommandFactory::new().create_command(&matches).unwrap();
    let result = command.execute();

    assert!(matches!(result, Err(PatchError::OutputExists(_))));
    assert_eq!(sorted_names(&root.join("hr_sub")).len(), 4);
    assert!(sorted_names(&root.join("lr_sub")).is_empty());
    assert!(!root.join("lr_sub2").exists());
}

/// Header claiming i32::MAX samples along every axis, followed by a few data bytes
fn write_oversized_header(dir: &Path, name: &str) -> PathBuf {
    let mut raw = vec![0u8; 1024];
    for offset in [0, 4, 8] {
        raw[offset..offset + 4].copy_from_slice(&i32::MAX.to_le_bytes());
    }
    raw[12..16].copy_from_slice(&2i32.to_le_bytes());
    raw[208..212].copy_from_slice(b"MAP ");
    raw[212..214].copy_from_slice(&[0x44, 0x44]);
    raw.extend_from_slice(&[0u8; 64]);
    let path = dir.join(name);
    fs::write(&path, raw).unwrap();
    path
}

#[test]
fn test_oversized_header_fails_only_its_own_file() {
    let temp = tempdir().unwrap();
    let input = temp.path().join("in");
    let output = temp.path().join("out");
    fs::create_dir(&input).unwrap();
    write_micrograph(&input, "good.mrc", 8, 8);
    write_oversized_header(&input, "huge.mrc");

    let summary = run_job(&job(&input, &output, 4, 4)).unwrap();

    assert_eq!(summary.total, 2);
    assert_eq!(summary.succeeded, 1);
    assert_eq!(summary.patches_written, 4);
    assert_eq!(summary.failures.len(), 1);
    let (path, error) = &summary.failures[0];
    assert_eq!(path.file_name().unwrap(), "huge.mrc");
    assert!(matches!(error, PatchError::Load { .. }));
}

#[test]
fn test_facade_plans_and_tiles_single_file() {
    let temp = tempdir().unwrap();
    let input = temp.path().join("in");
    let output = temp.path().join("out");
    fs::create_dir(&input).unwrap();
    fs::create_dir(&output).unwrap();
    let source = write_micrograph(&input, "mic.mrc", 8, 10);
    let kit = PatchKit::new();

    let plan = kit.plan(&source, &TileParams::new(4, 2, 0)).unwrap();
    assert_eq!(plan.row_offsets, vec![0, 2, 4]);
    assert_eq!(plan.col_offsets, vec![0, 2, 4, 6]);

    let report = kit.tile_file(&source, &job(&input, &output, 4, 2)).unwrap();
    assert_eq!(report.patches_written, plan.len());
    assert_eq!(sorted_names(&output).len(), 12);

    let header = kit.read_header(&output.join("mic_s012.mrc")).unwrap();
    assert_eq!((header.nx, header.ny, header.nz), (4, 4, 1));
}
