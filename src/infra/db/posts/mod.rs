mod read;
mod types;
mod write;

/// Column list shared by every statement that returns a full post row.
const POST_COLUMNS: &str = "id, title, slug, content, description, banner, thumbnail, \
                            published, created_at";

/// [`POST_COLUMNS`] qualified with the `p` alias used by read queries.
const POST_COLUMNS_P: &str = "p.id, p.title, p.slug, p.content, p.description, p.banner, \
                              p.thumbnail, p.published, p.created_at";
