pub mod h264_reader;
pub mod ivf_reader;
