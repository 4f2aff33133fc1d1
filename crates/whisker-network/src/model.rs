use burn::{
    config::Config,
    module::Module,
    nn::{
        conv::{Conv2d, Conv2dConfig},
        pool::{AdaptiveAvgPool2d, AdaptiveAvgPool2dConfig, MaxPool2d, MaxPool2dConfig},
        Dropout, DropoutConfig, Linear, LinearConfig, PaddingConfig2d, ReLU,
    },
    tensor::{backend::Backend, Tensor},
};

// The 1st dimension value of the shape of an image tensor: one plane per
// color channel of the input image (red, green, blue).
pub const INPUT_CHANNELS: usize = 3;

#[derive(Module, Debug)]
struct ConvBlock<B: Backend> {
    conv: Conv2d<B>,
    activation: ReLU,
    pool: MaxPool2d,
}

impl<B: Backend> ConvBlock<B> {
    fn forward(&self, input: Tensor<B, 4>) -> Tensor<B, 4> {
        let x = self.conv.forward(input);
        let x = self.activation.forward(x);

        self.pool.forward(x)
    }
}

#[derive(Config, Debug)]
struct ConvBlockConfig {
    input_channels: usize,
    filters: usize,
    kernel_length: usize,
}

impl ConvBlockConfig {
    fn init<B: Backend>(&self) -> ConvBlock<B> {
        ConvBlock {
            conv: Conv2dConfig::new(
                [self.input_channels, self.filters],
                [self.kernel_length, self.kernel_length],
            )
            .with_padding(PaddingConfig2d::Same)
            .init(),
            activation: ReLU::default(),
            // Each pooling discards three out of every four values per
            // channel and halves both spatial extents.
            pool: MaxPool2dConfig::new([2, 2]).with_strides([2, 2]).init(),
        }
    }
}

#[derive(Module, Debug)]
pub struct Model<B: Backend> {
    classes: usize,
    conv_blocks: Vec<ConvBlock<B>>,
    global_pool: AdaptiveAvgPool2d,
    fc_1: Linear<B>,
    activation: ReLU,
    dropout: Dropout,
    output: Linear<B>,
}

impl<B: Backend> Model<B> {
    pub fn classes(&self) -> usize {
        self.classes
    }

    // Dropout is the only stochastic step of the pass, and it only applies
    // on autodiff backends. On any other backend the output is a pure
    // function of the parameters and the input.
    pub fn forward(&self, input: Tensor<B, 4>) -> Tensor<B, 2> {
        let x = self
            .conv_blocks
            .iter()
            .fold(input, |x, block| block.forward(x));
        let x = self.global_pool.forward(x);
        let x = x.flatten(1, 3);
        let x = self.fc_1.forward(x);
        let x = self.activation.forward(x);
        let x = self.dropout.forward(x);

        self.output.forward(x)
    }
}

#[derive(Config, Debug)]
pub struct ModelConfig {
    #[config(default = 3)]
    pub classes: usize,
    #[config(default = 4)]
    pub conv_blocks: usize,
    #[config(default = 16)]
    pub base_filters: usize,
    #[config(default = 3)]
    pub kernel_length: usize,
    #[config(default = 512)]
    pub hidden_layer_size: usize,
    #[config(default = 0.5)]
    pub dropout: f64,
}

impl ModelConfig {
    // The smallest square input whose spatial extents survive every pooling
    // with a positive remainder.
    pub fn min_image_length(&self) -> usize {
        1 << self.conv_blocks
    }

    fn filters_after(&self, blocks: usize) -> usize {
        self.base_filters << (blocks - 1)
    }

    pub fn init<B: Backend>(&self) -> Model<B> {
        Model {
            classes: self.classes,
            conv_blocks: (0..self.conv_blocks)
                .map(|block| {
                    ConvBlockConfig::new(
                        if block == 0 {
                            INPUT_CHANNELS
                        } else {
                            self.filters_after(block)
                        },
                        self.filters_after(block + 1),
                        self.kernel_length,
                    )
                    .init()
                })
                .collect(),
            global_pool: AdaptiveAvgPool2dConfig::new([1, 1]).init(),
            fc_1: LinearConfig::new(self.filters_after(self.conv_blocks), self.hidden_layer_size)
                .init(),
            activation: ReLU::default(),
            dropout: DropoutConfig::new(self.dropout).init(),
            output: LinearConfig::new(self.hidden_layer_size, self.classes).init(),
        }
    }
}
