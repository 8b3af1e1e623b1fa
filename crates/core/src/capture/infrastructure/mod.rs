mod decode;
pub mod ffmpeg_camera_source;
pub mod ffmpeg_file_source;
pub mod source_factory;
