pub mod caption_quotes;
pub mod figure_shortcode;
pub mod link_caption;
pub mod simplify_captions;
