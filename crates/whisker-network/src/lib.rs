use burn::tensor::{backend::Backend, Shape, Tensor};
use image::RgbImage;

pub mod model;

fn channel_to_tensor<B: Backend>(image: &RgbImage, channel: usize) -> Tensor<B, 2> {
    let (width, height) = image.dimensions();
    // 8-bit intensities become floats in the unit interval.
    let intensities = image
        .pixels()
        .map(|pixel| f32::from(pixel.0[channel]) / f32::from(u8::MAX))
        .collect::<Vec<_>>();

    Tensor::from_floats(intensities.as_slice())
        .reshape(Shape::new([height as usize, width as usize]))
}

pub fn image_to_tensor<B: Backend>(image: &RgbImage) -> Tensor<B, 3> {
    Tensor::stack(
        (0..model::INPUT_CHANNELS)
            .map(|channel| channel_to_tensor(image, channel))
            .collect(),
        0,
    )
}

// All images are expected to share their dimensions, and at least one image
// must be given, as a batch cannot be empty.
pub fn images_to_tensor<B: Backend>(images: &[RgbImage]) -> Tensor<B, 4> {
    Tensor::stack(images.iter().map(image_to_tensor).collect(), 0)
}
