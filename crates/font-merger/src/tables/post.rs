//! post table merging

use read_fonts::{FontRef, TableProvider};
use write_fonts::tables::post::Post;

use crate::{Result, glyph_order::GlyphOrder, strategies::first};

/// Build a version 2 `post` carrying the merged glyph names.
///
/// Every other field comes from the first font.
pub fn merge_post(fonts: &[FontRef], order: &GlyphOrder) -> Result<Post> {
    let source = first(fonts)?.post()?;
    let mut post = Post::new_v2(order.names().iter().map(String::as_str));

    post.italic_angle = source.italic_angle();
    post.underline_position = source.underline_position();
    post.underline_thickness = source.underline_thickness();
    post.is_fixed_pitch = source.is_fixed_pitch();
    post.min_mem_type42 = source.min_mem_type42();
    post.max_mem_type42 = source.max_mem_type42();
    post.min_mem_type1 = source.min_mem_type1();
    post.max_mem_type1 = source.max_mem_type1();
    Ok(post)
}
