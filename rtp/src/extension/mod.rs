pub mod audio_level_extension;
